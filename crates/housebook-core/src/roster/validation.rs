use crate::error::{Field, ValidationErrors};
use crate::models::MemberFields;
use crate::photo::PhotoUpload;

/// Check member form input.
///
/// Every required text field must be non-empty after trimming. A photo must
/// be present when `photo_required` is set, and any photo given must pass
/// `PhotoUpload::problem`. Each bad field contributes exactly one error.
pub fn validate_member(
    fields: &MemberFields,
    photo: Option<&PhotoUpload>,
    photo_required: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let required = [
        (Field::Title, &fields.title, "Please select a title"),
        (Field::FirstName, &fields.first_name, "Please enter a first name"),
        (Field::LastName, &fields.last_name, "Please enter a last name"),
        (Field::Party, &fields.party, "Please enter a political party"),
        (Field::WorkHistory, &fields.work_history, "Please enter work history"),
    ];
    for (field, value, message) in required {
        if value.trim().is_empty() {
            errors.push(field, message);
        }
    }

    match photo {
        Some(photo) => {
            if let Some(problem) = photo.problem() {
                errors.push(Field::Photo, problem);
            }
        }
        None if photo_required => errors.push(Field::Photo, "Please choose a photo"),
        None => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
