use std::collections::BTreeSet;

/// Tables that are never shown to the model: audit logs, framework and
/// migration bookkeeping, demographic lookups.
pub const DEFAULT_EXCLUDED_TABLES: &[&str] = &[
    "__EFMigrationsHistory",
    "ANTENNE",
    "ANTENNE_LOG",
    "AspNetRoleClaims",
    "AspNetRoles",
    "AspNetUserClaims",
    "AspNetUserLogins",
    "AspNetUserRoles",
    "AspNetUsers",
    "AspNetUserTokens",
    "BATCH",
    "CLIENTI_LOG",
    "COEFFICIENTI_ANTENNE",
    "CustomCounters",
    "idtable",
    "ImportOpera",
    "LOG_ERRORI_SAP",
    "LX2002_AVERAGED_MESSAGES",
    "LX2002MESSAGES",
    "MaintenanceActions",
    "MaintenanceActionsUsedSpareParts",
    "MaintenanceDemographicActionTypes",
    "MaintenanceDemographicSpareParts",
    "MaintenanceDemographicSuppliers",
    "MaintenanceDemographicTargetItemProperties",
    "MaintenanceDemographicTargetItems",
    "MaintenanceDemographicTargetTypeProperties",
    "MaintenanceDemographicTargetTypes",
    "MaintenanceDemographicUnitOfMeasure",
    "MAP_INFO",
    "MENU",
    "MENUOPZIONI",
    "MOVIMBARC_USCITE_GENERATE_LOG",
    "NW_RILEVAZIONI_GIORNALIERE",
    "PARAMETRIGENERALI",
    "PN_ContiAttivi",
    "risorsebak",
    "STAMPE_IMMAGINI",
    "STAMPE_RENDLETT",
    "TRANSP_POSIZIONI",
    "TRANSP_POSIZIONI_LOG",
    "TRANSPONDER_WEIGHTS",
    "TRANSPONDERS",
    "VERSIONIPATCHDB",
];

/// Read-only set of table names removed from the schema context.
///
/// Matching is exact (case-sensitive), like the catalog names it is compared to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    tables: BTreeSet<String>,
}

impl ExclusionPolicy {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in list plus `extra`.
    pub fn with_defaults<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut policy = Self::new(DEFAULT_EXCLUDED_TABLES.iter().copied());
        policy.tables.extend(extra.into_iter().map(Into::into));
        policy
    }

    pub fn is_excluded(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
