//! Import identifier parsing and resolution
//!
//! Format: `domain1[:SCOPE],domain2[:SCOPE],...`

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use akamai_domainownership_api::{
    DomainKey, DomainRecord, DomainStatus, ValidationLevel, ValidationScope,
};

use crate::error::{CoreError, CoreResult};
use crate::services::domain_lookup::index_records;
use crate::services::{DomainLookup, ServiceContext};

/// Maximum number of entries in one import identifier.
pub const MAX_IMPORT_DOMAINS: usize = 1000;

/// One declaration of an import identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportEntry {
    pub domain_name: String,
    /// `None` when the scope is left for the resolver to find.
    pub validation_scope: Option<ValidationScope>,
}

impl std::fmt::Display for ImportEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.validation_scope {
            Some(scope) => write!(f, "{}:{scope}", self.domain_name),
            None => f.write_str(&self.domain_name),
        }
    }
}

/// Parses and checks an import identifier without calling the API.
pub fn parse_import_id(import_id: &str) -> CoreResult<Vec<ImportEntry>> {
    let raw: Vec<&str> = import_id.split(',').map(str::trim).collect();
    if raw.len() > MAX_IMPORT_DOMAINS {
        return Err(CoreError::TooManyImportDomains {
            count: raw.len(),
            max: MAX_IMPORT_DOMAINS,
        });
    }

    let mut entries = Vec::with_capacity(raw.len());
    let mut declared = HashSet::new();
    let mut bare = HashSet::new();
    let mut scoped = HashSet::new();

    for item in raw {
        let parts: Vec<&str> = item.split(':').map(str::trim).collect();
        let (name, scope) = match parts.as_slice() {
            [name] => (*name, None),
            [name, scope] => {
                let scope = scope
                    .to_uppercase()
                    .parse::<ValidationScope>()
                    .map_err(|e| CoreError::InvalidImportId(format!("'{item}': {e}")))?;
                (*name, Some(scope))
            }
            _ => {
                return Err(CoreError::InvalidImportId(format!(
                    "'{item}', expected 'domainName' or 'domainName:validationScope'"
                )));
            }
        };
        if name.is_empty() {
            return Err(CoreError::InvalidImportId(format!(
                "'{item}' has an empty domain name"
            )));
        }

        let entry = ImportEntry {
            domain_name: name.to_string(),
            validation_scope: scope,
        };
        if !declared.insert(entry.clone()) {
            return Err(CoreError::DuplicateImportEntry(entry.to_string()));
        }
        let (mine, other) = if scope.is_some() {
            (&mut scoped, &bare)
        } else {
            (&mut bare, &scoped)
        };
        if other.contains(name) {
            return Err(CoreError::DuplicateImportCombination(name.to_string()));
        }
        mine.insert(name.to_string());
        entries.push(entry);
    }

    Ok(entries)
}

/// Resolves import identifiers to API records.
pub struct ImportResolver {
    lookup: DomainLookup,
}

impl ImportResolver {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            lookup: DomainLookup::new(ctx),
        }
    }

    /// Returns one record per entry, in entry order.
    pub async fn resolve(&self, import_id: &str) -> CoreResult<Vec<DomainRecord>> {
        let entries = parse_import_id(import_id)?;

        let mut search_keys = Vec::new();
        for entry in &entries {
            match entry.validation_scope {
                Some(scope) => search_keys.push(DomainKey::new(entry.domain_name.clone(), scope)),
                None => search_keys.extend(
                    ValidationScope::ALL
                        .iter()
                        .map(|scope| DomainKey::new(entry.domain_name.clone(), *scope)),
                ),
            }
        }

        let found = index_records(self.lookup.search(&search_keys, true).await?);
        log::debug!(
            "Import search: {} keys requested, {} found",
            search_keys.len(),
            found.len()
        );

        entries
            .iter()
            .map(|entry| match entry.validation_scope {
                Some(scope) => resolve_scoped(&found, &entry.domain_name, scope),
                None => resolve_bare(&found, &entry.domain_name),
            })
            .collect()
    }
}

fn resolve_scoped(
    found: &HashMap<DomainKey, DomainRecord>,
    name: &str,
    scope: ValidationScope,
) -> CoreResult<DomainRecord> {
    let key = DomainKey::new(name, scope);
    let record = found
        .get(&key)
        .ok_or_else(|| CoreError::ImportNotFound(key.to_string()))?;

    if record.level() != ValidationLevel::Fqdn {
        return Err(CoreError::ImportNotFqdn {
            domain: key.to_string(),
            level: record.level(),
        });
    }
    if record.domain_status == DomainStatus::Invalidated {
        return Err(CoreError::ImportInvalidated(key.to_string()));
    }
    Ok(record.clone())
}

fn resolve_bare(found: &HashMap<DomainKey, DomainRecord>, name: &str) -> CoreResult<DomainRecord> {
    let matches: Vec<&DomainRecord> = ValidationScope::ALL
        .iter()
        .filter_map(|scope| found.get(&DomainKey::new(name, *scope)))
        .filter(|r| r.level() == ValidationLevel::Fqdn)
        .collect();

    let record = match matches.as_slice() {
        [] => return Err(CoreError::ImportNotFound(name.to_string())),
        [one] => *one,
        many => {
            return Err(CoreError::ImportMultipleScopes {
                domain_name: name.to_string(),
                scopes: many.iter().map(|r| r.validation_scope).collect(),
            });
        }
    };

    match record.domain_status {
        DomainStatus::Invalidated => Err(CoreError::ImportInvalidated(record.key().to_string())),
        DomainStatus::RequestAccepted => {
            Err(CoreError::ImportRequestAccepted(record.key().to_string()))
        }
        _ => Ok(record.clone()),
    }
}
