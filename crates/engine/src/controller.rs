//! Grid controller: reconciles the pointer, keyboard and clipboard state
//! machines against the single shared selection model, and emits events and
//! change batches toward the host.
//!
//! Everything here is synchronous except clipboard I/O. Copy is
//! fire-and-forget and last-write-wins; paste is two-phase so that a host
//! with an asynchronous clipboard can revalidate the data epoch captured at
//! paste start before any change record is applied.

use fabgrid_core::change::ChangeRecord;
use fabgrid_core::range::SelectionRange;

use crate::clipboard::{
    self, ClipboardBackend, MemoryClipboard, PasteOutcome, PendingPaste,
};
use crate::events::{
    DataChangedEvent, EventCallback, GridEvent, LogNotifier, NoticeLevel, Notifier,
    SelectionChangedEvent,
};
use crate::fill::{self, FillDirection};
use crate::navigation::{Modifiers, NavKey, Navigator};
use crate::schema::GridSchema;
use crate::selection::SelectionModel;
use crate::series;

pub struct GridController {
    selection: SelectionModel,
    navigator: Navigator,
    /// Generation counter for the hosted row collection; bumped on every
    /// `data_reloaded`. In-flight pastes captured against an older epoch are
    /// discarded on completion.
    epoch: u64,
    dragging: bool,
    clipboard: Box<dyn ClipboardBackend>,
    /// Legacy fallback used when the primary backend fails.
    fallback: Option<Box<dyn ClipboardBackend>>,
    notifier: Box<dyn Notifier>,
    observers: Vec<EventCallback>,
    /// Also write the HTML table rendition on copy.
    write_html: bool,
}

impl GridController {
    /// Controller over a grid of the given dimensions, with an in-memory
    /// clipboard. Hosts wire a platform backend via `set_clipboard`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            selection: SelectionModel::new(rows, cols),
            navigator: Navigator::default(),
            epoch: 0,
            dragging: false,
            clipboard: Box::new(MemoryClipboard::new()),
            fallback: None,
            notifier: Box::new(LogNotifier),
            observers: Vec::new(),
            write_html: true,
        }
    }

    pub fn set_clipboard(&mut self, backend: Box<dyn ClipboardBackend>) {
        self.clipboard = backend;
    }

    pub fn set_fallback_clipboard(&mut self, backend: Box<dyn ClipboardBackend>) {
        self.fallback = Some(backend);
    }

    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = notifier;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.navigator.set_page_size(page_size);
    }

    pub fn set_write_html(&mut self, write_html: bool) {
        self.write_html = write_html;
    }

    /// Register an observer for selection/data events.
    pub fn on_event(&mut self, callback: EventCallback) {
        self.observers.push(callback);
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// The identity or length of the row collection changed (reload, filter,
    /// page change): clear the selection and invalidate in-flight pastes.
    pub fn data_reloaded(&mut self, rows: usize, cols: usize) {
        self.selection.reset(rows, cols);
        self.epoch += 1;
        self.dragging = false;
        self.emit_selection();
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    pub fn pointer_down(&mut self, row: usize, col: usize, mods: Modifiers) {
        if mods.ctrl {
            self.selection.toggle_cell(row, col);
        } else if mods.shift {
            self.selection.extend_selection(row, col);
        } else {
            self.selection.start_selection(row, col);
            self.dragging = true;
        }
        self.emit_selection();
    }

    pub fn pointer_move(&mut self, row: usize, col: usize) {
        if !self.dragging {
            return;
        }
        // Only update if the cell changed to avoid event spam
        if self.selection.active() == Some((row, col)) {
            return;
        }
        self.selection.extend_selection(row, col);
        self.emit_selection();
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Returns true if the key was handled.
    pub fn handle_key(&mut self, key: NavKey, mods: Modifiers, schema: &dyn GridSchema) -> bool {
        let handled = self
            .navigator
            .handle(key, mods, &mut self.selection, schema);
        if handled {
            self.emit_selection();
        }
        handled
    }

    // =========================================================================
    // Row/column/all selection
    // =========================================================================

    pub fn select_row(&mut self, row: usize) {
        self.selection.select_row(row);
        self.emit_selection();
    }

    pub fn select_column(&mut self, col: usize) {
        self.selection.select_column(col);
        self.emit_selection();
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
        self.emit_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.emit_selection();
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Copy the current rectangular selection. Fire-and-forget: failures are
    /// routed to the fallback backend, then to the notifier and the log,
    /// never to the caller.
    pub fn copy(&mut self, schema: &dyn GridSchema) {
        let Some(rect) = self.selection.rect() else {
            return;
        };
        let mut payload = clipboard::serialize_selection(schema, &rect);
        if !self.write_html {
            payload.html.clear();
        }

        match self.clipboard.write(&payload) {
            Ok(()) => {
                self.notifier.notify(NoticeLevel::Info, "Copied to clipboard");
            }
            Err(err) => {
                log::warn!("clipboard write failed, trying fallback: {err}");
                let fallback_ok = match self.fallback.as_mut() {
                    Some(fallback) => fallback.write(&payload).is_ok(),
                    None => false,
                };
                if fallback_ok {
                    self.notifier.notify(NoticeLevel::Info, "Copied to clipboard");
                } else {
                    self.notifier
                        .notify(NoticeLevel::Warning, "Copy failed: clipboard unavailable");
                }
            }
        }
    }

    /// Capture the anchor and epoch for an asynchronous paste. Returns `None`
    /// when there is no active cell to anchor at.
    pub fn begin_paste(&self) -> Option<PendingPaste> {
        let anchor = self.selection.active()?;
        Some(PendingPaste {
            anchor,
            epoch: self.epoch,
        })
    }

    /// Finish a paste whose clipboard text has arrived. Stale pastes (epoch
    /// bumped since `begin_paste`) are discarded and reported as a no-op.
    /// On success the selection covers exactly the pasted rectangle and a
    /// `DataChanged` event carries the batch.
    pub fn complete_paste(
        &mut self,
        schema: &dyn GridSchema,
        pending: PendingPaste,
        text: &str,
    ) -> PasteOutcome {
        let outcome = clipboard::complete_paste(schema, pending, self.epoch, text);
        if pending.epoch != self.epoch {
            self.notifier
                .notify(NoticeLevel::Info, "Paste discarded: data changed");
            return outcome;
        }
        if let Some(pasted) = outcome.pasted {
            let (rows, cols) = self.selection.bounds();
            let needed_rows = pasted.max_row + 1;
            if needed_rows > rows {
                self.selection.resize(needed_rows, cols);
            }
            self.selection.set_range(SelectionRange::new(
                (pasted.min_row, pasted.min_col),
                (pasted.max_row, pasted.max_col),
            ));
            self.emit_selection();
        }
        if !outcome.is_empty() {
            self.emit(GridEvent::DataChanged(DataChangedEvent {
                changes: outcome.changes.clone(),
                appended_rows: outcome.appended_rows.clone(),
            }));
        }
        outcome
    }

    /// Synchronous paste: read the primary backend (falling back if needed)
    /// and complete immediately. Read failures yield an empty outcome.
    pub fn paste(&mut self, schema: &dyn GridSchema) -> PasteOutcome {
        let Some(pending) = self.begin_paste() else {
            return PasteOutcome::empty();
        };
        let text = match self.clipboard.read_text() {
            Ok(text) => text,
            Err(err) => {
                log::warn!("clipboard read failed, trying fallback: {err}");
                match self.fallback.as_mut().map(|f| f.read_text()) {
                    Some(Ok(text)) => text,
                    _ => {
                        self.notifier
                            .notify(NoticeLevel::Warning, "Paste failed: clipboard unavailable");
                        return PasteOutcome::empty();
                    }
                }
            }
        };
        self.complete_paste(schema, pending, &text)
    }

    // =========================================================================
    // Fill
    // =========================================================================

    /// Fixed-step fill over the current selection rectangle.
    pub fn fill(&mut self, schema: &dyn GridSchema, direction: FillDirection) -> Vec<ChangeRecord> {
        let Some(rect) = self.selection.rect() else {
            return Vec::new();
        };
        let changes = fill::fill(schema, &rect, direction);
        if !changes.is_empty() {
            self.emit(GridEvent::DataChanged(DataChangedEvent {
                changes: changes.clone(),
                appended_rows: Vec::new(),
            }));
        }
        changes
    }

    /// Pattern-extending fill over the current selection rectangle.
    pub fn fill_series(
        &mut self,
        schema: &dyn GridSchema,
        direction: FillDirection,
    ) -> Vec<ChangeRecord> {
        let Some(rect) = self.selection.rect() else {
            return Vec::new();
        };
        let changes = series::fill_series(schema, &rect, direction);
        if !changes.is_empty() {
            self.emit(GridEvent::DataChanged(DataChangedEvent {
                changes: changes.clone(),
                appended_rows: Vec::new(),
            }));
        }
        changes
    }

    // =========================================================================
    // Events
    // =========================================================================

    fn emit(&mut self, event: GridEvent) {
        for observer in &mut self.observers {
            observer(event.clone());
        }
    }

    fn emit_selection(&mut self) {
        let event = GridEvent::SelectionChanged(SelectionChangedEvent {
            range: self.selection.range(),
            cells: self.selection.cells().to_sorted_vec(),
        });
        self.emit(event);
    }
}
