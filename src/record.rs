//! Harvested data records
//!
//! `Subcategory` values are discovered once per run; `BusinessRecord` values
//! are created from one detail page each and never modified afterwards.

/// Address placeholder when the detail page has no address block
pub const NO_ADDRESS: &str = "Unknown";

/// Phone placeholder when the detail page has no `tel:` link
pub const NO_PHONE: &str = "No Phone";

/// Map placeholder when the detail page has no navigation link
pub const NO_MAP: &str = "No Map";

/// Description placeholder when no products/services text was found
pub const NO_DESCRIPTION: &str = "No Description";

/// Column headers of the dataset, in output order
pub const DATASET_COLUMNS: [&str; 7] = [
    "Subcategory",
    "Name",
    "Address",
    "Phone",
    "Map",
    "Description",
    "Profile URL",
];

/// A named grouping under a root category with its own paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subcategory {
    pub name: String,

    /// Absolute URL of the first listing page
    pub url: String,
}

impl Subcategory {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Fields pulled from a detail page by the extraction rules
///
/// Only `name` is mandatory; the rule set reports a page without one as a
/// failed extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub map_link: Option<String>,
    pub description: Option<String>,
}

/// One business harvested from a detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    pub subcategory: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub map_link: String,
    pub description: String,
    pub profile_url: String,
}

impl BusinessRecord {
    /// Builds a record, substituting sentinels for absent optional fields
    pub fn from_fields(subcategory: &str, fields: DetailFields, profile_url: &str) -> Self {
        Self {
            subcategory: subcategory.to_string(),
            name: fields.name,
            address: fields.address.unwrap_or_else(|| NO_ADDRESS.to_string()),
            phone: fields.phone.unwrap_or_else(|| NO_PHONE.to_string()),
            map_link: fields.map_link.unwrap_or_else(|| NO_MAP.to_string()),
            description: fields
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            profile_url: profile_url.to_string(),
        }
    }

    /// Row values in `DATASET_COLUMNS` order
    pub fn as_row(&self) -> [&str; 7] {
        [
            self.subcategory.as_str(),
            self.name.as_str(),
            self.address.as_str(),
            self.phone.as_str(),
            self.map_link.as_str(),
            self.description.as_str(),
            self.profile_url.as_str(),
        ]
    }
}
