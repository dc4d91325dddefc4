//! Domain models.

pub mod campaign;
pub mod category;
pub mod comment;
pub mod contact;
pub mod donation;
pub mod favorite;
pub mod update;
pub mod user;

pub use campaign::{Campaign, CampaignStatus, ListCampaignsQuery, FEATURED_CAMPAIGN_CAP};
pub use category::Category;
pub use comment::Comment;
pub use contact::ContactMessage;
pub use donation::{Donation, PaymentStatus};
pub use favorite::Favorite;
pub use update::CampaignUpdate;
pub use user::{User, UserRole};
