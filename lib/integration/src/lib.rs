//! External collaborators for the copper-almanac platform.
//!
//! This crate provides:
//!
//! - **Calendar**: the `Calendar` trait and a Google Calendar backend
//! - **Messenger**: the `Messenger` trait and a Twilio WhatsApp backend
//! - **Rate limiting**: a per-key sliding-window limiter for inbound
//!   traffic

pub mod calendar;
pub mod error;
pub mod google;
pub mod messenger;
pub mod rate_limit;

pub use calendar::{Calendar, CreatedEvent};
pub use error::CalendarError;
pub use google::{GoogleCalendar, GoogleCalendarConfig};
pub use messenger::{Messenger, TwilioConfig, TwilioMessenger};
pub use rate_limit::{SlidingWindowLimiter, SlidingWindowConfig};
