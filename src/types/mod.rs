//! Types for the SES `SendEmail` request body.
//!
//! - [`EmailAddress`] and [`address_list`]: RFC 5322 address parsing and the
//!   `Display Name <addr>` formatting SES expects
//! - [`SendEmailPayload`]: the JSON body sent to `/v2/email/outbound-emails`

mod address;
mod payload;

pub use address::{address_list, parse_address_list, EmailAddress};
pub use payload::{Destination, EmailContent, RawContent, SendEmailPayload};
