//! Application layer containing the onboarding orchestration.
//!
//! This module defines the `OnboardingService` which acts as the single entry
//! point for turning a submission into a persisted customer. Collaborators
//! (store, account number allocator, notifier) are injected as trait objects.

pub mod onboarding;
