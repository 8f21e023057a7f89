// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{BootFile, ComponentSpec, RawBootFile};
use crate::errors::{BootError, Result};

impl TryFrom<RawBootFile> for BootFile {
    type Error = BootError;

    fn try_from(raw: RawBootFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_file(&raw)?;
        Ok(BootFile::new_unchecked(raw.run, raw.component))
    }
}

fn validate_raw_file(file: &RawBootFile) -> Result<()> {
    ensure_has_components(file)?;
    file.run.validate()?;
    validate_component_ids(file)?;
    validate_include(file)?;
    Ok(())
}

fn ensure_has_components(file: &RawBootFile) -> Result<()> {
    if file.component.is_empty() {
        return Err(BootError::ConfigError(
            "boot definition must contain at least one [[component]] entry".to_string(),
        ));
    }
    Ok(())
}

/// Top-level ids must be non-empty and unique. Children only need non-empty
/// ids; they are never scheduled.
///
/// Dependencies on undefined ids are deliberately not rejected here: the
/// scheduler reports them as unresolvable at run time.
fn validate_component_ids(file: &RawBootFile) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for spec in &file.component {
        if !seen.insert(spec.id.as_str()) {
            return Err(BootError::InvalidDefinition(format!(
                "duplicate component id '{}'",
                spec.id
            )));
        }
        check_spec(spec)?;
    }

    Ok(())
}

fn check_spec(spec: &ComponentSpec) -> Result<()> {
    if spec.id.trim().is_empty() {
        return Err(BootError::InvalidDefinition(
            "component id must not be empty".to_string(),
        ));
    }
    if spec.after.iter().any(|dep| dep == &spec.id) {
        return Err(BootError::InvalidDefinition(format!(
            "component '{}' cannot depend on itself in `after`",
            spec.id
        )));
    }
    for child in &spec.children {
        check_spec(child)?;
    }
    Ok(())
}

fn validate_include(file: &RawBootFile) -> Result<()> {
    for id in &file.run.included_component_ids {
        if !file.component.iter().any(|c| &c.id == id) {
            return Err(BootError::ConfigError(format!(
                "[run].include names unknown component '{id}'"
            )));
        }
    }
    Ok(())
}
