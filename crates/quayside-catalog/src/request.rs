//! Write requests and their CLI argument vectors.
//!
//! Maps are `BTreeMap`s so arguments always come out in ascending key
//! order, which keeps invocations deterministic and easy to diff in logs.

use std::collections::BTreeMap;

use quayside_common::error::{QuaysideError, Result};

/// Parameters for `create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContainer {
    /// Name assigned to the new container.
    pub name: String,
    /// Image reference to create it from.
    pub image: String,
    /// Volume name → mount target inside the container.
    pub volumes: BTreeMap<String, String>,
}

impl NewContainer {
    /// Builds `create --name <name> [--volume vol:target]* <image>`.
    ///
    /// Volume entries with a blank name or target are dropped.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the name or image is blank.
    pub fn to_args(&self) -> Result<Vec<String>> {
        let name = required("container name", &self.name)?;
        let image = required("image reference", &self.image)?;

        let mut args = vec!["create".to_string(), "--name".to_string(), name.to_string()];
        for (volume, target) in non_blank(&self.volumes) {
            args.push("--volume".to_string());
            args.push(format!("{volume}:{target}"));
        }
        args.push(image.to_string());
        Ok(args)
    }
}

/// Parameters for `volume create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewVolume {
    /// Volume name.
    pub name: String,
    /// Requested size (e.g. "10G"), passed through verbatim.
    pub size: Option<String>,
    /// Driver options.
    pub options: BTreeMap<String, String>,
    /// Labels.
    pub labels: BTreeMap<String, String>,
}

impl NewVolume {
    /// Builds `volume create <name> [-s size] [--opt K=V]* [--label K=V]*`.
    ///
    /// Options and labels with a blank key or value are dropped, as is a
    /// blank size.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the name is blank.
    pub fn to_args(&self) -> Result<Vec<String>> {
        let name = required("volume name", &self.name)?;

        let mut args = vec!["volume".to_string(), "create".to_string(), name.to_string()];
        if let Some(size) = self.size.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            args.push("-s".to_string());
            args.push(size.to_string());
        }
        for (key, value) in non_blank(&self.options) {
            args.push("--opt".to_string());
            args.push(format!("{key}={value}"));
        }
        for (key, value) in non_blank(&self.labels) {
            args.push("--label".to_string());
            args.push(format!("{key}={value}"));
        }
        Ok(args)
    }
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QuaysideError::Config {
            message: format!("{what} must not be empty"),
        });
    }
    Ok(trimmed)
}

/// Entries with both sides trimmed and non-empty, re-sorted by trimmed key.
fn non_blank(map: &BTreeMap<String, String>) -> BTreeMap<&str, &str> {
    map.iter()
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_volumes_are_sorted_and_blank_entries_dropped() {
        let mut request = NewContainer {
            name: "db".into(),
            image: "pg:17".into(),
            ..NewContainer::default()
        };
        let _ = request.volumes.insert("zeta".into(), "/z".into());
        let _ = request.volumes.insert("alpha".into(), "/a".into());
        let _ = request.volumes.insert("   ".into(), "/ignored".into());
        let _ = request.volumes.insert("mid".into(), "  ".into());

        assert_eq!(
            request.to_args().unwrap(),
            vec![
                "create",
                "--name",
                "db",
                "--volume",
                "alpha:/a",
                "--volume",
                "zeta:/z",
                "pg:17"
            ]
        );
    }

    #[test]
    fn container_without_volumes() {
        let request = NewContainer {
            name: "web".into(),
            image: "nginx".into(),
            ..NewContainer::default()
        };
        assert_eq!(
            request.to_args().unwrap(),
            vec!["create", "--name", "web", "nginx"]
        );
    }

    #[test]
    fn blank_container_name_is_rejected() {
        let request = NewContainer {
            name: " ".into(),
            image: "nginx".into(),
            ..NewContainer::default()
        };
        assert!(matches!(
            request.to_args(),
            Err(QuaysideError::Config { .. })
        ));
    }

    #[test]
    fn volume_args_follow_template_order() {
        let mut request = NewVolume {
            name: "pgdata".into(),
            size: Some("10G".into()),
            ..NewVolume::default()
        };
        let _ = request.options.insert("b".into(), "2".into());
        let _ = request.options.insert("a".into(), "1".into());
        let _ = request.options.insert("".into(), "x".into());
        let _ = request.labels.insert("app".into(), "db".into());
        let _ = request.labels.insert("empty".into(), String::new());

        assert_eq!(
            request.to_args().unwrap(),
            vec![
                "volume", "create", "pgdata", "-s", "10G", "--opt", "a=1", "--opt", "b=2",
                "--label", "app=db"
            ]
        );
    }

    #[test]
    fn blank_volume_size_is_omitted() {
        let request = NewVolume {
            name: "cache".into(),
            size: Some("  ".into()),
            ..NewVolume::default()
        };
        assert_eq!(request.to_args().unwrap(), vec!["volume", "create", "cache"]);
    }
}
