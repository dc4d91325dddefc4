//! Repository implementations.
//!
//! Every query binds request-derived values as parameters; no repository
//! interpolates caller input into SQL text.

pub mod campaign;
pub mod category;
pub mod comment;
pub mod contact;
pub mod donation;
pub mod favorite;
pub mod update;
pub mod user;

pub use campaign::{CampaignRepository, CampaignWithCreator, FeatureOutcome, NewCampaign, UpdateCampaign};
pub use category::CategoryRepository;
pub use comment::{CommentRepository, CommentWithAuthor};
pub use contact::ContactRepository;
pub use donation::{
    DonationOutcome, DonationRepository, DonationWithCampaign, DonationWithDonor, NewDonation,
};
pub use favorite::FavoriteRepository;
pub use update::UpdateRepository;
pub use user::{NewUser, UpdateProfile, UserRepository};
