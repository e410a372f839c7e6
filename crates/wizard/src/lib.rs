//! Multi-step campaign creation wizard.
//!
//! A bounded three-step flow: company & purpose, trigger & context, preview &
//! send. Moving past the first step is a plain validated transition; moving
//! past the second and third only happens as the side effect of a successful
//! remote call (template generation and campaign send respectively).
//! Outcomes are reported through the notification center, never as panics or
//! raw errors.

pub mod parse;
pub mod step;
pub mod wizard;

pub use step::WizardStep;
pub use wizard::CampaignWizard;
