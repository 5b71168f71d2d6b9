//! Human-readable formatting for error messages.
//!
//! Consumed only when planning fails: missing-registration and ambiguity
//! errors dump the target's metadata and every binding the container
//! hierarchy knows for the identifier, so misconfiguration can be diagnosed
//! from the message alone.

use crate::bindings::{Binding, BindingKind};
use crate::container::Container;
use crate::identifier::ServiceIdentifier;
use crate::planning::target::{INJECT_TAG, MULTI_INJECT_TAG, Target};

pub fn service_identifier_string(service_identifier: &ServiceIdentifier) -> String {
    service_identifier.to_string()
}

/// The target's identifier followed by its name/tag metadata, one per line.
pub fn list_metadata_for_target(target: &Target) -> String {
    let mut out = service_identifier_string(target.service_identifier());
    if target.is_named() || target.is_tagged() {
        for metadata in target.metadata() {
            if metadata.key() == INJECT_TAG || metadata.key() == MULTI_INJECT_TAG {
                continue;
            }
            out.push_str("\n ");
            out.push_str(&metadata.to_string());
        }
    }
    out
}

/// Every binding the hierarchy knows for `service_identifier`, or the empty
/// string when there are none.
pub fn list_registered_bindings(
    container: &Container,
    service_identifier: &ServiceIdentifier,
) -> String {
    let bindings = container.bindings_for(service_identifier);
    if bindings.is_empty() {
        return String::new();
    }
    let mut out = String::from("\nRegistered bindings:");
    for binding in &bindings {
        out.push_str("\n ");
        out.push_str(&describe_binding(binding));
    }
    out
}

fn describe_binding(binding: &Binding) -> String {
    let implementation = match binding.kind() {
        BindingKind::Instance { implementation } | BindingKind::Constructor { implementation } => {
            implementation.short_name()
        }
        other => return format!("{other} {{ scope: {} }}", binding.scope()),
    };
    let mut out = format!(
        "{implementation} {{ kind: {}, scope: {} }}",
        binding.kind(),
        binding.scope()
    );
    if !matches!(binding.constraint(), crate::bindings::Constraint::Always) {
        out.push_str(&format!(" when {}", binding.constraint()));
    }
    out
}
