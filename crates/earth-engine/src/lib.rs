//! Earth Engine access for the dataset builder.
//!
//! The remote service evaluates a computation graph built client-side. This
//! crate provides:
//!
//! - [`expression`]: typed builders (`Image`, `ImageCollection`, `Filter`)
//!   that serialize to the REST `Expression` format
//! - [`collections`]: the two collection queries the dataset uses, plus the
//!   Sentinel-2 cloud mask
//! - [`auth`]: bearer token providers, including refreshing credentials
//! - [`client`]: the REST client creating and downloading per-band exports
//! - [`archive`]: extraction of a download into a scoped temporary directory

pub mod archive;
pub mod auth;
pub mod client;
pub mod collections;
pub mod error;
pub mod expression;

pub use archive::BandArchive;
pub use auth::{RefreshCredentials, RefreshToken, StaticToken, TokenProvider};
pub use client::{ClientConfig, EarthEngineClient, ExportRequest, ImageArchive};
pub use collections::{CloudFilter, CloudMask, CollectionQuery};
pub use error::{EarthEngineError, Result};
pub use expression::{Expr, Filter, Geometry, Image, ImageCollection};
