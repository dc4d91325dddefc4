//! Entity definitions mapping database rows to domain models.
//!
//! Enumerated columns are stored as text and parsed back through the
//! domain `FromStr` impls; an unknown value in the database surfaces as a
//! decode error instead of being silently coerced.

pub mod campaign;
pub mod category;
pub mod comment;
pub mod contact;
pub mod donation;
pub mod favorite;
pub mod update;
pub mod user;

pub use campaign::{CampaignEntity, CampaignWithCreatorEntity};
pub use category::CategoryEntity;
pub use comment::{CommentEntity, CommentWithAuthorEntity};
pub use contact::ContactMessageEntity;
pub use donation::{DonationEntity, DonationWithCampaignEntity, DonationWithDonorEntity};
pub use favorite::FavoriteEntity;
pub use update::CampaignUpdateEntity;
pub use user::UserEntity;

use std::str::FromStr;

/// Parses a text column into a domain enum, mapping failures to a sqlx
/// decode error so repositories can use `?` uniformly.
pub(crate) fn decode_enum<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e: String| sqlx::Error::Decode(e.into()))
}
