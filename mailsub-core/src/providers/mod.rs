pub mod klaviyo;
pub mod mailchimp;

pub use klaviyo::Klaviyo;
pub use mailchimp::Mailchimp;
