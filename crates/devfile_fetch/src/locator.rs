//! Locator classification and relative resolution.
//!
//! A locator is either a URL (`http`, `https`, `file`) or a filesystem path.

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::{FetchError, FetchResult};

/// Where a locator points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    File(PathBuf),
}

/// Classify a locator. Plain paths (relative or absolute) become
/// [`Location::File`].
pub fn parse_locator(locator: &str) -> FetchResult<Location> {
    match Url::parse(locator) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Location::Remote(url)),
            "file" => url
                .to_file_path()
                .map(Location::File)
                .map_err(|_| FetchError::Unreachable {
                    locator: locator.to_string(),
                    message: "file URL does not name a local path".to_string(),
                }),
            // Windows drive letters parse as a one-letter scheme
            scheme if scheme.len() == 1 => Ok(Location::File(PathBuf::from(locator))),
            scheme => Err(FetchError::UnsupportedScheme {
                locator: locator.to_string(),
                scheme: scheme.to_string(),
            }),
        },
        Err(_) => Ok(Location::File(PathBuf::from(locator))),
    }
}

/// True when the locator is neither a URL nor an absolute path.
pub fn is_relative(locator: &str) -> bool {
    match Url::parse(locator) {
        Ok(url) => url.scheme().len() == 1 && Path::new(locator).is_relative(),
        Err(_) => Path::new(locator).is_relative(),
    }
}

/// Resolve `locator` against the location of the document that referenced it.
///
/// Relative locators require a base: a URL base is joined per RFC 3986, a
/// path base resolves against its parent directory. Under a URL base every
/// locator stays remote: http(s) URLs pass through, plain paths (absolute
/// ones included) are joined onto the base URL, and any other scheme is
/// refused. Under a path base or no base, absolute locators are returned
/// unchanged.
pub fn resolve_locator(locator: &str, base: Option<&str>) -> FetchResult<String> {
    let Some(base) = base else {
        if is_relative(locator) {
            return Err(FetchError::RelativeLocator {
                locator: locator.to_string(),
            });
        }
        return Ok(locator.to_string());
    };

    match parse_locator(base)? {
        Location::Remote(url) => join_remote(locator, base, &url),
        Location::File(path) => {
            if !is_relative(locator) {
                return Ok(locator.to_string());
            }
            let dir = path.parent().unwrap_or_else(|| Path::new(""));
            Ok(dir.join(locator).to_string_lossy().into_owned())
        }
    }
}

fn join_remote(locator: &str, base: &str, url: &Url) -> FetchResult<String> {
    if let Ok(parsed) = Url::parse(locator) {
        return match parsed.scheme() {
            "http" | "https" => Ok(locator.to_string()),
            _ => Err(FetchError::NotRemote {
                locator: locator.to_string(),
                base: base.to_string(),
            }),
        };
    }

    url.join(locator)
        .map(|joined| joined.to_string())
        .map_err(|e| FetchError::Unreachable {
            locator: locator.to_string(),
            message: format!("cannot join with base {}: {}", base, e),
        })
}
