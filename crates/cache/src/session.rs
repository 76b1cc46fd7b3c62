//! Sessions: one experiment's tables, loaded on first use.

use crate::api::{AnalysisApi, BehaviorApi, SessionMetadata};
use crate::error::{ErrorKind, Result};
use crate::lazy::LazyProperty;
use behavior_table::Table;
use std::collections::BTreeMap;

/// Index name the trials table takes when joined onto trial responses.
pub const TRIAL_ID: &str = "trial_id";
pub const IMAGE_INDEX_COLUMN: &str = "image_index";
pub const IMAGE_NAME_COLUMN: &str = "image_name";

/// The tables every session file provides, each read at most once.
#[derive(Debug)]
pub struct BehaviorSession<A> {
    api: A,
    trials: LazyProperty<Table>,
    stimulus_presentations: LazyProperty<Table>,
    metadata: LazyProperty<SessionMetadata>,
}

impl<A: BehaviorApi> BehaviorSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            trials: LazyProperty::new("trials"),
            stimulus_presentations: LazyProperty::new("stimulus_presentations"),
            metadata: LazyProperty::new("metadata"),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn trials(&self) -> Result<&Table> {
        self.trials.get_or_compute(|| self.api.get_trials())
    }

    pub fn stimulus_presentations(&self) -> Result<&Table> {
        self.stimulus_presentations.get_or_compute(|| self.api.get_stimulus_presentations())
    }

    pub fn metadata(&self) -> Result<&SessionMetadata> {
        self.metadata.get_or_compute(|| self.api.get_metadata())
    }
}

/// A [`BehaviorSession`] with analysis tables derived from it.
///
/// Every derived view is computed on first access and cached for the life
/// of the session. A failed computation is not cached; the next access
/// tries again.
#[derive(Debug)]
pub struct ExtendedSession<A> {
    base: BehaviorSession<A>,
    trial_response_df: LazyProperty<Table>,
    flash_response_df: LazyProperty<Table>,
    image_index: LazyProperty<BTreeMap<i64, String>>,
}

impl<A: AnalysisApi> ExtendedSession<A> {
    pub fn new(api: A) -> Self {
        Self::from_session(BehaviorSession::new(api))
    }

    pub fn from_session(base: BehaviorSession<A>) -> Self {
        Self {
            base,
            trial_response_df: LazyProperty::new("trial_response_df"),
            flash_response_df: LazyProperty::new("flash_response_df"),
            image_index: LazyProperty::new("image_index"),
        }
    }

    pub fn base(&self) -> &BehaviorSession<A> {
        &self.base
    }

    pub fn api(&self) -> &A {
        self.base.api()
    }

    pub fn trials(&self) -> Result<&Table> {
        self.base.trials()
    }

    pub fn stimulus_presentations(&self) -> Result<&Table> {
        self.base.stimulus_presentations()
    }

    pub fn metadata(&self) -> Result<&SessionMetadata> {
        self.base.metadata()
    }

    /// Per-cell trial responses with the trial columns joined on.
    ///
    /// The trials index is renamed to `trial_id` and joined onto the
    /// `trial_id` level of the response table. Responses for trials missing
    /// from the trials table keep null trial columns.
    pub fn trial_response_df(&self) -> Result<&Table> {
        self.trial_response_df.get_or_compute(|| -> Result<Table> {
            let responses = self.api().get_trial_response_df()?;
            let trials = self.trials()?.rename_index(&[TRIAL_ID]).map_err(ErrorKind::table)?;
            responses.left_join(&trials).map_err(ErrorKind::table)
        })
    }

    pub fn flash_response_df(&self) -> Result<&Table> {
        self.flash_response_df.get_or_compute(|| self.api().get_flash_response_df())
    }

    /// Image name for each image index seen in the stimulus presentations.
    ///
    /// When presentations sharing an index carry different names, the name
    /// of the earliest presentation is kept. Presentations with a null index
    /// or name are ignored.
    pub fn image_index(&self) -> Result<&BTreeMap<i64, String>> {
        self.image_index.get_or_compute(|| -> Result<BTreeMap<i64, String>> {
            self.stimulus_presentations()?
                .first_value_by(IMAGE_INDEX_COLUMN, IMAGE_NAME_COLUMN)
                .map_err(ErrorKind::table)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DataApi, NwbApi};
    use crate::testing::{EXPERIMENT_ID, bools, i64s, paths, populated_store, strs};
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::{Float64Type, Int64Type};
    use behavior_table::error::ErrorKind as TableErrorKind;
    use behavior_table::store::MemoryStore;
    use rstest::{fixture, rstest};
    use std::rc::Rc;

    type TestSession = ExtendedSession<DataApi<NwbApi<Rc<MemoryStore>>, Rc<MemoryStore>>>;

    #[fixture]
    fn store() -> Rc<MemoryStore> {
        populated_store(EXPERIMENT_ID)
    }

    fn session(store: &Rc<MemoryStore>) -> TestSession {
        let paths = paths(EXPERIMENT_ID);
        ExtendedSession::new(DataApi::new(NwbApi::new(paths.nwb.clone(), store.clone()), store.clone(), paths))
    }

    #[rstest]
    fn test_trial_response_df_joins_trials(store: Rc<MemoryStore>) {
        let session = session(&store);
        let responses = session.trial_response_df().unwrap();

        assert_eq!(responses.num_rows(), 4);
        assert_eq!(responses.index_names(), ["trial_id", "cell_specimen_id"]);
        assert_eq!(responses.column_names(), ["trial_id", "cell_specimen_id", "mean_response", "change_time", "hit"]);
        let change_time = responses.column("change_time").unwrap().as_primitive::<Float64Type>().clone();
        assert_eq!(change_time.value(0), 1.5);
        assert_eq!(change_time.value(1), 1.5);
        assert_eq!(change_time.value(2), 9.0);
        assert!(change_time.is_null(3), "trial 5 is not in the trials table");
        // The session's own trials keep their original index.
        assert_eq!(session.trials().unwrap().index_names(), ["trials_id"]);
    }

    #[rstest]
    fn test_lazy_properties_read_once(store: Rc<MemoryStore>) {
        let session = session(&store);
        let paths = session.api().paths().clone();

        session.trial_response_df().unwrap();
        session.trial_response_df().unwrap();
        session.flash_response_df().unwrap();
        session.flash_response_df().unwrap();
        session.image_index().unwrap();
        session.image_index().unwrap();

        assert_eq!(store.reads(&paths.trial_response, "df"), 1);
        assert_eq!(store.reads(&paths.flash_response, "df"), 1);
        assert_eq!(store.reads(&paths.extended_stimulus_presentations, "df"), 1);
        assert_eq!(store.reads(&paths.nwb, "trials"), 1);
        assert_eq!(store.reads(&paths.nwb, "stimulus_presentations"), 1);
    }

    #[rstest]
    fn test_failure_is_retried(store: Rc<MemoryStore>) {
        let session = session(&store);
        let paths = session.api().paths().clone();
        let flash = store.remove(paths.flash_response.clone(), "df").unwrap();

        let err = session.flash_response_df().unwrap_err();
        assert!(matches!(*err, ErrorKind::Table(TableErrorKind::NotFound(_))), "unexpected error: {err:?}");

        store.insert(paths.flash_response.clone(), "df", flash.clone());
        assert_eq!(session.flash_response_df().unwrap(), &flash);
        session.flash_response_df().unwrap();
        assert_eq!(store.reads(&paths.flash_response, "df"), 2);
    }

    #[rstest]
    fn test_failure_does_not_block_other_properties(store: Rc<MemoryStore>) {
        let session = session(&store);
        store.remove(session.api().paths().trial_response.clone(), "df");

        assert!(session.trial_response_df().is_err());
        assert_eq!(session.flash_response_df().unwrap().num_rows(), 2);
        assert!(session.trials().is_ok());
        assert!(session.trial_response_df().is_err());
    }

    #[rstest]
    fn test_image_index(store: Rc<MemoryStore>) {
        let session = session(&store);
        let images = session.image_index().unwrap();
        assert_eq!(images, &BTreeMap::from([(0, "im065".to_string()), (1, "im077".to_string())]));
    }

    /// Presentations sharing an index but naming different images resolve to
    /// the earliest name, without any warning.
    #[rstest]
    fn test_image_index_ambiguous_group_keeps_first_name(store: Rc<MemoryStore>) {
        let session = session(&store);
        let nwb = session.api().paths().nwb.clone();
        let presentations = Table::from_columns(
            &["stimulus_presentations_id"],
            [
                ("stimulus_presentations_id", i64s(&[0, 1, 2, 3])),
                ("image_index", i64s(&[4, 4, 2, 4])),
                ("image_name", strs(&["im104", "im114", "im083", "im104"])),
                ("omitted", bools(&[false; 4])),
            ],
        )
        .unwrap();
        store.insert(nwb, "stimulus_presentations", presentations);

        let images = session.image_index().unwrap();
        assert_eq!(images, &BTreeMap::from([(2, "im083".to_string()), (4, "im104".to_string())]));
    }

    #[rstest]
    fn test_stimulus_presentations_are_joined(store: Rc<MemoryStore>) {
        let session = session(&store);
        let presentations = session.stimulus_presentations().unwrap();
        assert_eq!(presentations.num_rows(), 4);
        assert_eq!(presentations.column_names().iter().filter(|name| **name == "omitted").count(), 1);
        let ids = presentations.column("stimulus_presentations_id").unwrap().as_primitive::<Int64Type>().clone();
        assert_eq!(ids.values().to_vec(), vec![0, 1, 2, 3]);
    }

    #[rstest]
    fn test_metadata(store: Rc<MemoryStore>) {
        let session = session(&store);
        assert_eq!(session.metadata().unwrap().ophys_experiment_id, EXPERIMENT_ID);
        assert_eq!(session.metadata().unwrap().rig_name.as_deref(), Some("CAM2P.5"));
        assert_eq!(store.reads(&session.api().paths().nwb, "metadata"), 1);
    }
}
