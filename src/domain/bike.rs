//! Bike domain model and the filter vocabularies the listing understands.
//!
//! [`Bike`] mirrors one element of the backend's `bikes/` response. The backend
//! is loose about field types (prices arrive as strings or numbers, images as a
//! relative path or a hosted-image object), so the model accepts both forms.
//!
//! [`BikeType`], [`BikeStatus`] and [`SortOrder`] are the closed sets of values
//! the filter controls offer. Their wire form is used unchanged in the page URL
//! and in the API query.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::error::BikeRentalError;

/// A bike as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub bike_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub price_per_hour: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<BikeImage>,
    #[serde(default)]
    pub added_on: Option<String>,
}

/// The `image` field: either a stored path or a hosted-image object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BikeImage {
    Path(String),
    Hosted { url: Option<String> },
}

impl Bike {
    /// Resolves the image to display for this bike.
    ///
    /// Priority: the external `image_url`, then a hosted image's `url`, then a
    /// stored path. Stored paths that are already absolute are used as is,
    /// relative ones are joined to the API origin (`api_base` with its
    /// `/api/v1/` suffix removed).
    ///
    /// # Examples
    ///
    /// ```
    /// use bike_rental::domain::Bike;
    ///
    /// let bike: Bike = serde_json::from_str(r#"{"id": 1, "image": "/media/b.jpg"}"#).unwrap();
    /// assert_eq!(
    ///     bike.image_url("https://api.example.com/api/v1/").as_deref(),
    ///     Some("https://api.example.com/media/b.jpg")
    /// );
    /// ```
    #[must_use]
    pub fn image_url(&self, api_base: &str) -> Option<String> {
        if let Some(url) = self.image_url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }

        match &self.image {
            Some(BikeImage::Hosted { url: Some(url) }) if !url.is_empty() => Some(url.clone()),
            Some(BikeImage::Path(path)) if !path.is_empty() => {
                if path.starts_with("http") {
                    Some(path.clone())
                } else {
                    let origin = api_base.replace("/api/v1/", "");
                    Some(format!("{origin}{path}"))
                }
            }
            _ => None,
        }
    }

    /// Price per hour as text, whichever form the backend used.
    #[must_use]
    pub fn price_label(&self) -> Option<String> {
        match self.price_per_hour.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Returns whether `url` can be used as an image source.
#[must_use]
pub fn is_valid_image_url(url: &str) -> bool {
    url.starts_with("http")
}

/// Implements the string conversions shared by the three filter vocabularies.
macro_rules! filter_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($wire:literal, $label:literal) ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),*
        }

        impl $name {
            /// Every value, in the order the filter control lists them.
            pub const ALL: &'static [Self] = &[$( Self::$variant ),*];

            /// The value used in URLs and API queries.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),*
                }
            }

            /// The human-readable label shown by the filter control.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),*
                }
            }
        }

        impl FromStr for $name {
            type Err = BikeRentalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )*
                    other => Err(BikeRentalError::Validation(format!(
                        concat!("unknown ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

filter_vocabulary! {
    /// Kind of bike offered for rent.
    BikeType {
        Mountain => ("Mountain", "Mountain"),
        CityRide => ("City ride", "City Ride"),
        Road => ("Road", "Road"),
        Hybrid => ("Hybrid", "Hybrid"),
        Electric => ("Electric", "Electric"),
        Bmx => ("BMX", "BMX"),
    }
}

filter_vocabulary! {
    /// Rental availability of a bike.
    BikeStatus {
        Available => ("available", "Available"),
        Booked => ("booked", "Booked"),
        InUse => ("in_use", "In Use"),
    }
}

filter_vocabulary! {
    /// Server-side ordering applied to the listing.
    SortOrder {
        PriceAsc => ("price_per_hour", "Price: Low to High"),
        PriceDesc => ("-price_per_hour", "Price: High to Low"),
        NameAsc => ("name", "Name: A to Z"),
        NameDesc => ("-name", "Name: Z to A"),
        AddedOn => ("added_on", "Newest First"),
        AddedOnDesc => ("-added_on", "Oldest First"),
    }
}
