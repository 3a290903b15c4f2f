//! State behind the provider's availability screen: the slot list, the
//! create/edit dialog and per-row delete progress.
//!
//! Dialog lifecycle:
//! `Closed -> Open(create | edit) -> Submitting -> Closed`.
//! A validation failure leaves the dialog `Open` with field errors; a failed
//! request drops it back to `Open` with an error notice.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{AvailabilityForm, AvailabilityInput, AvailabilitySlot, FieldErrors, Location};
use crate::pages::Notice;
use crate::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DialogMode {
    Create,
    Edit { id: i64 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Dialog {
    #[default]
    Closed,
    Open {
        mode: DialogMode,
        form: AvailabilityForm,
        errors: FieldErrors,
    },
    Submitting {
        mode: DialogMode,
        form: AvailabilityForm,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    #[error("The availability dialog is already open")]
    AlreadyOpen,
    #[error("The availability dialog is not open")]
    NotOpen,
    #[error("Availability is being saved, please wait")]
    Busy,
    #[error("Please correct the highlighted fields")]
    Invalid(FieldErrors),
}

/// A validated request the caller must send, then report back through
/// [`AvailabilityPage::finish_submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    pub mode: DialogMode,
    pub input: AvailabilityInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRow {
    #[serde(flatten)]
    pub slot: AvailabilitySlot,
    pub day_label: &'static str,
    pub type_label: &'static str,
    pub repeat_label: &'static str,
    pub location_label: Option<String>,
    /// Delete in flight; this row's actions are disabled.
    pub deleting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOption {
    pub id: i64,
    pub label: String,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityView {
    pub rows: Vec<SlotRow>,
    pub locations: Vec<LocationOption>,
    pub dialog: Dialog,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default)]
pub struct AvailabilityPage {
    slots: Vec<AvailabilitySlot>,
    locations: Vec<Location>,
    dialog: Dialog,
    deleting: BTreeSet<i64>,
    notice: Option<Notice>,
}

impl AvailabilityPage {
    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn replace_slots(&mut self, slots: Vec<AvailabilitySlot>) {
        self.slots = slots;
    }

    pub fn replace_locations(&mut self, locations: Vec<Location>) {
        self.locations = locations;
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn open_create(&mut self) -> Result<(), DialogError> {
        self.open(DialogMode::Create, AvailabilityForm::default())
    }

    pub fn open_edit(&mut self, slot: &AvailabilitySlot) -> Result<(), DialogError> {
        self.open(DialogMode::Edit { id: slot.id }, AvailabilityForm::from(slot))
    }

    fn open(&mut self, mode: DialogMode, form: AvailabilityForm) -> Result<(), DialogError> {
        match self.dialog {
            Dialog::Closed => {
                self.dialog = Dialog::Open {
                    mode,
                    form,
                    errors: FieldErrors::default(),
                };
                Ok(())
            }
            Dialog::Open { .. } => Err(DialogError::AlreadyOpen),
            Dialog::Submitting { .. } => Err(DialogError::Busy),
        }
    }

    pub fn cancel(&mut self) -> Result<(), DialogError> {
        match self.dialog {
            Dialog::Submitting { .. } => Err(DialogError::Busy),
            Dialog::Open { .. } | Dialog::Closed => {
                self.dialog = Dialog::Closed;
                Ok(())
            }
        }
    }

    /// Validates `form` against the open dialog. On success the dialog moves
    /// to `Submitting`; on failure it stays open with the field errors.
    pub fn begin_submit(
        &mut self,
        form: AvailabilityForm,
        provider_id: i64,
    ) -> Result<SubmitTicket, DialogError> {
        let mode = match &self.dialog {
            Dialog::Open { mode, .. } => *mode,
            Dialog::Submitting { .. } => return Err(DialogError::Busy),
            Dialog::Closed => return Err(DialogError::NotOpen),
        };
        match form.clone().into_input(provider_id) {
            Ok(input) => {
                self.dialog = Dialog::Submitting { mode, form };
                Ok(SubmitTicket { mode, input })
            }
            Err(errors) => {
                self.dialog = Dialog::Open {
                    mode,
                    form,
                    errors: errors.clone(),
                };
                Err(DialogError::Invalid(errors))
            }
        }
    }

    pub fn finish_submit(&mut self, outcome: &Result<(), ApiError>) {
        let (mode, form) = match &self.dialog {
            Dialog::Submitting { mode, form } => (*mode, form.clone()),
            _ => return,
        };
        match outcome {
            Ok(()) => {
                self.dialog = Dialog::Closed;
                self.notice = Some(Notice::success(match mode {
                    DialogMode::Create => "Availability created",
                    DialogMode::Edit { .. } => "Availability updated",
                }));
            }
            Err(err) => {
                self.dialog = Dialog::Open {
                    mode,
                    form,
                    errors: FieldErrors::default(),
                };
                self.notice = Some(Notice::error(err.to_string()));
            }
        }
    }

    /// Marks row `id` as deleting. False when a delete for it is already
    /// in flight.
    pub fn begin_delete(&mut self, id: i64) -> bool {
        self.deleting.insert(id)
    }

    pub fn finish_delete(&mut self, id: i64, outcome: &Result<(), ApiError>) {
        self.deleting.remove(&id);
        self.notice = Some(match outcome {
            Ok(()) => Notice::success("Availability deleted"),
            Err(err) => Notice::error(err.to_string()),
        });
    }

    /// Snapshot for rendering. The pending notice is handed out once.
    pub fn view(&mut self) -> AvailabilityView {
        let rows = self
            .slots
            .iter()
            .map(|slot| SlotRow {
                day_label: slot.day_of_week.label(),
                type_label: slot.availability_type.label(),
                repeat_label: slot.repeat_type.label(),
                location_label: slot.location_id.map(|id| self.location_label(id)),
                deleting: self.deleting.contains(&slot.id),
                slot: slot.clone(),
            })
            .collect();
        let locations = self
            .locations
            .iter()
            .map(|loc| LocationOption {
                id: loc.id,
                label: loc.label(),
                selectable: loc.is_selectable(),
            })
            .collect();
        AvailabilityView {
            rows,
            locations,
            dialog: self.dialog.clone(),
            notice: self.notice.take(),
        }
    }

    fn location_label(&self, id: i64) -> String {
        self.locations
            .iter()
            .find(|loc| loc.id == id)
            .map(Location::label)
            .unwrap_or_else(|| format!("Location #{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AvailabilityType, DayOfWeek, RepeatType};
    use crate::pages::Severity;

    fn slot(id: i64) -> AvailabilitySlot {
        AvailabilitySlot {
            id,
            provider_id: 7,
            availability_type: AvailabilityType::Offline,
            day_of_week: DayOfWeek::Monday,
            start_time: "09:00".into(),
            end_time: "11:00".into(),
            repeat_type: RepeatType::None,
            location_id: Some(3),
            is_active: true,
        }
    }

    fn virtual_form() -> AvailabilityForm {
        AvailabilityForm {
            availability_type: Some(AvailabilityType::Virtual),
            day_of_week: Some(DayOfWeek::Wednesday),
            start_time: "13:00".into(),
            end_time: "15:00".into(),
            ..AvailabilityForm::default()
        }
    }

    #[test]
    fn create_cycle_closes_on_success() {
        let mut page = AvailabilityPage::default();
        page.open_create().unwrap();
        assert_eq!(page.open_create(), Err(DialogError::AlreadyOpen));

        let ticket = page.begin_submit(virtual_form(), 7).unwrap();
        assert_eq!(ticket.mode, DialogMode::Create);
        assert_eq!(ticket.input.provider_id, 7);
        assert!(matches!(page.dialog(), Dialog::Submitting { .. }));
        assert_eq!(page.cancel(), Err(DialogError::Busy));

        page.finish_submit(&Ok(()));
        assert_eq!(page.dialog(), &Dialog::Closed);
        let view = page.view();
        assert_eq!(view.notice, Some(Notice::success("Availability created")));
        assert_eq!(page.view().notice, None);
    }

    #[test]
    fn invalid_form_keeps_dialog_open() {
        let mut page = AvailabilityPage::default();
        page.open_create().unwrap();
        let form = AvailabilityForm {
            location_id: Some(3),
            ..virtual_form()
        };
        let err = page.begin_submit(form, 7).unwrap_err();
        let DialogError::Invalid(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(
            errors.get("locationId"),
            Some("Virtual availability cannot have a location")
        );
        match page.dialog() {
            Dialog::Open { errors, .. } => assert!(errors.contains("locationId")),
            other => panic!("dialog should stay open, got {other:?}"),
        }
    }

    #[test]
    fn server_failure_reopens_with_notice() {
        let mut page = AvailabilityPage::default();
        page.open_edit(&slot(4)).unwrap();
        let form = match page.dialog() {
            Dialog::Open { form, mode, .. } => {
                assert_eq!(*mode, DialogMode::Edit { id: 4 });
                form.clone()
            }
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(form.location_id, Some(3));

        page.begin_submit(form.clone(), 7).unwrap();
        page.finish_submit(&Err(ApiError::Failed("Failed to update availability".into())));
        match page.dialog() {
            Dialog::Open { form: kept, .. } => assert_eq!(kept, &form),
            other => panic!("unexpected {other:?}"),
        }
        let notice = page.view().notice.unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Failed to update availability");
    }

    #[test]
    fn submit_requires_open_dialog() {
        let mut page = AvailabilityPage::default();
        assert_eq!(
            page.begin_submit(virtual_form(), 1).unwrap_err(),
            DialogError::NotOpen
        );
        assert!(page.cancel().is_ok());
    }

    #[test]
    fn delete_marks_only_its_row() {
        let mut page = AvailabilityPage::default();
        page.replace_slots(vec![slot(1), slot(2), slot(3)]);
        assert!(page.begin_delete(2));
        assert!(!page.begin_delete(2));

        let view = page.view();
        let flags: Vec<(i64, bool)> = view.rows.iter().map(|r| (r.slot.id, r.deleting)).collect();
        assert_eq!(flags, vec![(1, false), (2, true), (3, false)]);

        page.finish_delete(2, &Err(ApiError::Failed("Failed to delete availability".into())));
        assert!(page.view().rows.iter().all(|r| !r.deleting));
        assert!(page.begin_delete(2));
    }

    #[test]
    fn rows_carry_labels() {
        let mut page = AvailabilityPage::default();
        page.replace_slots(vec![slot(1)]);
        let view = page.view();
        assert_eq!(view.rows[0].day_label, "Monday");
        assert_eq!(view.rows[0].location_label.as_deref(), Some("Location #3"));
    }
}
