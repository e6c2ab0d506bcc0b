//! Two-page item entry flow.
//!
//! # Responsibility
//! - Hold the in-progress draft and location selection between pages.
//! - Enforce page transitions: details -> location -> submit/back.
//!
//! # Invariants
//! - A failed submit leaves step, draft and selection untouched.
//! - A successful submit resets to a fresh draft on the details page.

use crate::model::location::{Facet, LocationTriple};
use crate::model::pantry_item::{Category, PantryItemDraft, DATE_FORMAT};
use crate::repo::pantry_item_repo::{PantryItemRepository, SavedPantryItem};
use crate::repo::RepoError;
use crate::service::pantry_service::PantryItemWriter;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Months added to the purchase date for the default expiry.
pub const DEFAULT_SHELF_LIFE_MONTHS: u32 = 3;

/// Page currently shown by the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Details,
    Location,
}

/// Serializable snapshot of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub step: FormStep,
    pub draft: PantryItemDraft,
    pub location: LocationTriple,
}

impl FormState {
    /// Fresh state with the defaults shown when the form opens.
    pub fn initial(today: NaiveDate) -> Self {
        let expiry = today
            .checked_add_months(Months::new(DEFAULT_SHELF_LIFE_MONTHS))
            .unwrap_or(today);
        Self {
            step: FormStep::Details,
            draft: PantryItemDraft {
                name: String::new(),
                quantity: "1".to_string(),
                cost: String::new(),
                category: Category::default().as_str().to_string(),
                amount: None,
                date_bought: today.format(DATE_FORMAT).to_string(),
                date_expiry: expiry.format(DATE_FORMAT).to_string(),
            },
            location: LocationTriple::new("kitchen", "cabinet", "top"),
        }
    }
}

#[derive(Debug)]
pub enum FormFlowError {
    /// Action is not allowed from the current page.
    InvalidTransition {
        from: FormStep,
        action: &'static str,
    },
    /// Persisting the draft failed; the form keeps its values.
    Submit(RepoError),
}

impl Display for FormFlowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { from, action } => {
                write!(f, "cannot `{action}` from the {from:?} page")
            }
            Self::Submit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormFlowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTransition { .. } => None,
            Self::Submit(err) => Some(err),
        }
    }
}

/// Entry form state machine.
#[derive(Debug, Clone)]
pub struct FormFlow {
    state: FormState,
    today: NaiveDate,
}

impl FormFlow {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: FormState::initial(today),
            today,
        }
    }

    /// Restores a previously captured snapshot.
    pub fn restore(state: FormState, today: NaiveDate) -> Self {
        Self { state, today }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn step(&self) -> FormStep {
        self.state.step
    }

    pub fn draft(&self) -> &PantryItemDraft {
        &self.state.draft
    }

    /// Mutable access for text inputs (name, quantity, cost).
    pub fn draft_mut(&mut self) -> &mut PantryItemDraft {
        &mut self.state.draft
    }

    pub fn location(&self) -> &LocationTriple {
        &self.state.location
    }

    pub fn set_category(&mut self, category: Category) {
        self.state.draft.category = category.as_str().to_string();
    }

    pub fn set_date_bought(&mut self, date: NaiveDate) {
        self.state.draft.date_bought = date.format(DATE_FORMAT).to_string();
    }

    pub fn set_date_expiry(&mut self, date: NaiveDate) {
        self.state.draft.date_expiry = date.format(DATE_FORMAT).to_string();
    }

    /// Selects a chip value for one facet of the location.
    pub fn set_location_facet(&mut self, facet: Facet, value: impl Into<String>) {
        self.state.location.set_facet(facet, value);
    }

    pub fn next(&mut self) -> Result<(), FormFlowError> {
        self.transition(FormStep::Details, "next")?;
        self.state.step = FormStep::Location;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), FormFlowError> {
        self.transition(FormStep::Location, "back")?;
        self.state.step = FormStep::Details;
        Ok(())
    }

    /// Persists the draft at the selected location.
    ///
    /// # Contract
    /// - Only allowed from the location page.
    /// - On success the form returns to a fresh details page.
    /// - On failure nothing in the form changes.
    pub fn submit<R: PantryItemRepository>(
        &mut self,
        writer: &mut PantryItemWriter<R>,
    ) -> Result<SavedPantryItem, FormFlowError> {
        self.transition(FormStep::Location, "submit")?;
        let saved = writer
            .save(&self.state.draft, &self.state.location)
            .map_err(FormFlowError::Submit)?;
        self.reset();
        Ok(saved)
    }

    /// Discards the draft and returns to the details page.
    pub fn reset(&mut self) {
        self.state = FormState::initial(self.today);
    }

    fn transition(&self, expected: FormStep, action: &'static str) -> Result<(), FormFlowError> {
        if self.state.step != expected {
            return Err(FormFlowError::InvalidTransition {
                from: self.state.step,
                action,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FormFlow, FormFlowError, FormState, FormStep};
    use crate::model::location::Facet;
    use crate::model::pantry_item::Category;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn initial_state_uses_form_defaults() {
        let flow = FormFlow::new(today());
        assert_eq!(flow.step(), FormStep::Details);
        assert_eq!(flow.draft().quantity, "1");
        assert_eq!(flow.draft().category, "food");
        assert_eq!(flow.draft().date_bought, "2024-01-31");
        // Month arithmetic clamps to the last day of April.
        assert_eq!(flow.draft().date_expiry, "2024-04-30");
        assert_eq!(flow.location().room, "kitchen");
        assert_eq!(flow.location().spot_noun, "cabinet");
        assert_eq!(flow.location().spot_direction, "top");
    }

    #[test]
    fn next_and_back_move_between_pages() {
        let mut flow = FormFlow::new(today());
        flow.next().unwrap();
        assert_eq!(flow.step(), FormStep::Location);
        flow.back().unwrap();
        assert_eq!(flow.step(), FormStep::Details);
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut flow = FormFlow::new(today());
        assert!(matches!(
            flow.back(),
            Err(FormFlowError::InvalidTransition {
                from: FormStep::Details,
                action: "back",
            })
        ));

        flow.next().unwrap();
        assert!(matches!(
            flow.next(),
            Err(FormFlowError::InvalidTransition {
                from: FormStep::Location,
                ..
            })
        ));
    }

    #[test]
    fn setters_update_draft_and_selection() {
        let mut flow = FormFlow::new(today());
        flow.set_category(Category::Hygiene);
        flow.set_location_facet(Facet::Room, "bathroom");
        flow.draft_mut().name = "Soap".to_string();

        assert_eq!(flow.draft().category, "hygiene");
        assert_eq!(flow.location().room, "bathroom");
        assert_eq!(flow.draft().name, "Soap");
    }

    #[test]
    fn state_snapshot_roundtrips_through_restore() {
        let mut flow = FormFlow::new(today());
        flow.draft_mut().name = "Rice".to_string();
        flow.next().unwrap();

        let snapshot: FormState = flow.state().clone();
        let restored = FormFlow::restore(snapshot, today());
        assert_eq!(restored.step(), FormStep::Location);
        assert_eq!(restored.draft().name, "Rice");
    }
}
