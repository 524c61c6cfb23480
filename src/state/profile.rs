//! Profile edit form.
//!
//! The form is seeded from the current user snapshot and always submits all
//! three text fields, so clearing the bio really clears it. A picture is sent
//! only when one has been attached, which switches the request to multipart.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use crate::net::error::{ApiError, FieldErrors};
use crate::net::types::{ProfileUpdate, Upload, User};
use crate::state::auth::{AuthBackend, AuthContext};
use crate::util::guard::{self, Outcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    picture: Option<Upload>,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
}

impl ProfileForm {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        let mut form = Self::default();
        form.reset(user);
        form
    }

    /// Discard edits and the attached picture.
    pub fn reset(&mut self, user: &User) {
        self.first_name.clone_from(&user.first_name);
        self.last_name.clone_from(&user.last_name);
        self.bio = user.bio.clone().unwrap_or_default();
        self.picture = None;
        self.error = None;
        self.field_errors.clear();
    }

    pub fn attach_picture(&mut self, upload: Upload) {
        self.picture = Some(upload);
    }

    pub fn remove_picture(&mut self) {
        self.picture = None;
    }

    #[must_use]
    pub fn picture(&self) -> Option<&Upload> {
        self.picture.as_ref()
    }

    #[must_use]
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            bio: Some(self.bio.clone()),
            profile_picture: self.picture.clone(),
        }
    }

    /// Send the form through the auth context, which adopts the returned
    /// user. On success the form is re-seeded from that user.
    ///
    /// # Errors
    ///
    /// Returns the backend error; its message and field errors are also
    /// kept on the form.
    pub async fn submit<B: AuthBackend>(&mut self, auth: &AuthContext<B>) -> Result<Outcome<User>, ApiError> {
        if let Some(outcome) = guard::check_action(&auth.state()) {
            return Ok(outcome);
        }
        self.error = None;
        self.field_errors.clear();
        match auth.update_profile(&self.to_update()).await {
            Ok(user) => {
                self.reset(&user);
                Ok(Outcome::Done(user))
            }
            Err(error) => {
                self.error = Some(error.message());
                if let Some(fields) = error.field_errors() {
                    self.field_errors.clone_from(fields);
                }
                Err(error)
            }
        }
    }
}
