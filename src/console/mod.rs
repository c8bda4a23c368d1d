//! Client-side state of the config email console.
//!
//! [`Console`] owns the record cache, the selection set, and whichever dialog
//! is open, and hands the selection to the bulk and delete flows explicitly.
//! Every write ends in a cache invalidation; the next read refetches.

pub mod bulk;
pub mod cache;
pub mod delete;
pub mod form;
pub mod mutation;
pub mod report;
pub mod selection;
pub mod view;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::ConfigEmailApi;
use crate::error::ConsoleError;
use crate::models::{ConfigRecord, ConfigStatus};

use bulk::{BulkOutcome, BulkStatusCoordinator};
use cache::RecordCache;
use delete::{DeleteFlow, DeletePrompt};
use form::RecordForm;
use mutation::{MutationReconciler, SubmitOutcome};
use report::ReportExporter;
use selection::SelectionSet;
use view::RowIntent;

pub struct Console {
    cache: Arc<RecordCache>,
    selection: SelectionSet,
    form: Option<RecordForm>,
    delete_prompt: Option<DeletePrompt>,
    mutations: MutationReconciler,
    bulk: BulkStatusCoordinator,
    deletes: DeleteFlow,
    reports: ReportExporter,
    api: Arc<dyn ConfigEmailApi>,
}

impl Console {
    pub fn new(api: Arc<dyn ConfigEmailApi>) -> Self {
        let cache = Arc::new(RecordCache::new());
        Self {
            mutations: MutationReconciler::new(Arc::clone(&api), Arc::clone(&cache)),
            bulk: BulkStatusCoordinator::new(Arc::clone(&api), Arc::clone(&cache)),
            deletes: DeleteFlow::new(Arc::clone(&api), Arc::clone(&cache)),
            reports: ReportExporter::new(Arc::clone(&api)),
            cache,
            selection: SelectionSet::new(),
            form: None,
            delete_prompt: None,
            api,
        }
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub async fn records(&self) -> Result<Arc<Vec<ConfigRecord>>, ConsoleError> {
        Ok(self.cache.get(&*self.api).await?)
    }

    pub async fn find(&self, id: i64) -> Result<ConfigRecord, ConsoleError> {
        let records = self.records().await?;
        view::find_record(&records, id)
            .cloned()
            .ok_or(ConsoleError::RecordNotFound(id))
    }

    pub async fn render(&self) -> Result<String, ConsoleError> {
        let records = self.records().await?;
        Ok(view::render_table(&records, &self.selection))
    }

    // --- selection ---

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle_row(&mut self, id: i64) -> bool {
        self.selection.toggle(id)
    }

    /// Select-all over the rows currently loaded.
    pub async fn toggle_all(&mut self) -> Result<(), ConsoleError> {
        let records = self.records().await?;
        self.selection.toggle_all(view::loaded_ids(&records));
        Ok(())
    }

    // --- form ---

    pub fn open_create_form(&mut self) -> &mut RecordForm {
        self.form.insert(RecordForm::create())
    }

    pub async fn open_edit_form(&mut self, id: i64) -> Result<&mut RecordForm, ConsoleError> {
        let record = self.find(id).await?;
        Ok(self.form.insert(RecordForm::edit(&record)))
    }

    pub fn form(&self) -> Option<&RecordForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut RecordForm> {
        self.form.as_mut()
    }

    /// The dialog is dropped only when the save succeeded.
    pub async fn submit_form(&mut self) -> Result<SubmitOutcome, ConsoleError> {
        let form = self.form.as_mut().ok_or(ConsoleError::NoOpenForm)?;
        let outcome = self.mutations.submit(form).await?;
        if !form.is_open() {
            self.form = None;
        }
        Ok(outcome)
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    // --- row actions ---

    pub async fn handle_intent(&mut self, intent: RowIntent) -> Result<(), ConsoleError> {
        match intent {
            RowIntent::Edit(id) => {
                self.open_edit_form(id).await?;
            }
            RowIntent::Delete(id) => {
                self.request_delete(id).await?;
            }
        }
        Ok(())
    }

    pub async fn request_delete(&mut self, id: i64) -> Result<&DeletePrompt, ConsoleError> {
        let record = self.find(id).await?;
        let prompt = DeletePrompt::for_record(&record).ok_or(ConsoleError::RecordNotFound(id))?;
        Ok(self.delete_prompt.insert(prompt))
    }

    pub fn request_delete_selected(&mut self) -> Option<&DeletePrompt> {
        let prompt = DeletePrompt::for_selection(&self.selection)?;
        Some(self.delete_prompt.insert(prompt))
    }

    pub fn delete_prompt(&self) -> Option<&DeletePrompt> {
        self.delete_prompt.as_ref()
    }

    /// The prompt survives a failed delete so it can be confirmed again.
    pub async fn confirm_delete(&mut self) -> Result<usize, ConsoleError> {
        let prompt = self
            .delete_prompt
            .as_ref()
            .ok_or(ConsoleError::NoPendingDelete)?;
        let deleted = self.deletes.confirm(prompt, &mut self.selection).await?;
        self.delete_prompt = None;
        Ok(deleted)
    }

    pub fn cancel_delete(&mut self) {
        self.delete_prompt = None;
    }

    // --- bulk + export ---

    pub async fn set_selected_status(
        &mut self,
        status: ConfigStatus,
    ) -> Result<BulkOutcome, ConsoleError> {
        Ok(self.bulk.apply(&mut self.selection, status).await?)
    }

    pub async fn export_report(&self, dir: &Path) -> Result<PathBuf, ConsoleError> {
        Ok(self.reports.export_to(dir).await?)
    }
}
