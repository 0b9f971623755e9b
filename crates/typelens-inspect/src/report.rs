//! Reflection reports for the inspector.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use typelens_reflect::{ReflectorConfig, ReflectorFactory, TypeMetadata};
use typelens_types::{ClassKind, TypeHandle, TypeTable, TypeUniverse, UniverseBuilder};

/// What reflection found for one type.
#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub default_constructor: bool,
    pub readable: Vec<PropertyReport>,
    pub writable: Vec<PropertyReport>,
}

#[derive(Debug, Serialize)]
pub struct PropertyReport {
    pub name: String,
    /// Resolved generic type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Erased type.
    pub raw: String,
    /// Method or field the accessor goes through.
    pub via: String,
}

/// Build one universe from `tables` and reflect `requested`, or every
/// non-primitive type the tables define when `requested` is empty.
pub fn inspect(
    tables: Vec<TypeTable>,
    requested: &[String],
    config: ReflectorConfig,
) -> anyhow::Result<Vec<TypeReport>> {
    let names: Vec<String> = if requested.is_empty() {
        tables
            .iter()
            .flat_map(|t| &t.types)
            .filter(|def| def.kind != ClassKind::Primitive)
            .map(|def| def.name.clone())
            .collect()
    } else {
        requested.to_vec()
    };

    let universe = tables
        .into_iter()
        .fold(UniverseBuilder::new(), UniverseBuilder::table)
        .build()
        .context("failed to build the type universe")?;
    let universe = Arc::new(universe);
    let factory = ReflectorFactory::with_config(Arc::clone(&universe), config);

    names
        .iter()
        .map(|name| -> anyhow::Result<TypeReport> {
            let handle = universe
                .lookup(name)
                .with_context(|| format!("unknown type `{}`", name))?;
            Ok(report(&factory, handle))
        })
        .collect()
}

fn report(factory: &ReflectorFactory, handle: TypeHandle) -> TypeReport {
    let universe = factory.universe();
    let name = universe.name(handle).to_string();
    match factory.metadata(handle) {
        Ok(meta) => TypeReport {
            name,
            error: None,
            default_constructor: meta.has_default_constructor(),
            readable: properties(universe, &meta, meta.readable_properties(), true),
            writable: properties(universe, &meta, meta.writable_properties(), false),
        },
        Err(err) => {
            log::warn!("{}: {}", name, err);
            TypeReport {
                name,
                error: Some(err.to_string()),
                default_constructor: false,
                readable: Vec::new(),
                writable: Vec::new(),
            }
        }
    }
}

fn properties<'a>(
    universe: &TypeUniverse,
    meta: &TypeMetadata,
    names: impl Iterator<Item = &'a str>,
    read: bool,
) -> Vec<PropertyReport> {
    names
        .filter_map(|name| {
            let (generic, raw, invoker) = if read {
                (
                    meta.read_generic_type(name).ok()?,
                    meta.read_type(name).ok()?,
                    meta.read_invoker(name).ok()?,
                )
            } else {
                (
                    meta.write_generic_type(name).ok()?,
                    meta.write_type(name).ok()?,
                    meta.write_invoker(name).ok()?,
                )
            };
            Some(PropertyReport {
                name: name.to_string(),
                ty: universe.display(generic).to_string(),
                raw: universe.display_raw(raw).to_string(),
                via: invoker.member().to_string(),
            })
        })
        .collect()
}

/// One block per type: a header line, then one indented line per property.
impl fmt::Display for TypeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if let Some(error) = &self.error {
            return writeln!(f, "  error: {}", error);
        }
        writeln!(
            f,
            "  default constructor: {}",
            if self.default_constructor { "yes" } else { "no" }
        )?;
        for (label, props) in [("read ", &self.readable), ("write", &self.writable)] {
            for p in props {
                writeln!(f, "  {} {}: {} (via {})", label, p.name, p.ty, p.via)?;
            }
        }
        Ok(())
    }
}

/// Plain-text rendering of every report.
pub fn render_text(reports: &[TypeReport]) -> String {
    reports.iter().map(TypeReport::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../tables/sample.json");

    fn sample() -> Vec<TypeReport> {
        let table: TypeTable = serde_json::from_str(SAMPLE).unwrap();
        inspect(vec![table], &[], ReflectorConfig::default()).unwrap()
    }

    fn find<'a>(reports: &'a [TypeReport], name: &str) -> &'a TypeReport {
        reports.iter().find(|r| r.name == name).unwrap()
    }

    fn prop<'a>(props: &'a [PropertyReport], name: &str) -> &'a PropertyReport {
        props.iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_sample_reports_every_type() {
        let reports = sample();
        assert_eq!(reports.len(), 9);
        assert_eq!(reports[0].name, "Animal");
    }

    #[test]
    fn test_sample_generic_resolution() {
        let reports = sample();

        let strings = find(&reports, "StringContainer");
        assert_eq!(prop(&strings.readable, "item").ty, "String");
        assert_eq!(prop(&strings.readable, "items").ty, "Vec<String>");
        assert_eq!(prop(&strings.readable, "items").raw, "Vec");
        assert!(strings.readable.iter().all(|p| p.name != "DEFAULT_CAPACITY"));

        let kennel = find(&reports, "Kennel");
        assert_eq!(prop(&kennel.readable, "item").ty, "Animal");
        assert_eq!(prop(&kennel.readable, "id").ty, "i64");
        assert_eq!(prop(&kennel.readable, "empty").via, "Container.isEmpty");
        assert!(kennel.default_constructor);
    }

    #[test]
    fn test_sample_conflicts() {
        let reports = sample();

        let owner = find(&reports, "DogOwner");
        assert_eq!(prop(&owner.readable, "pet").ty, "Dog");
        assert_eq!(prop(&owner.writable, "pet").ty, "Dog");

        let legacy = find(&reports, "LegacyRecord");
        assert!(legacy.error.as_deref().unwrap().contains("ambiguous"));
        assert!(render_text(&reports).contains("LegacyRecord\n  error:"));
    }

    #[test]
    fn test_private_access_off_hides_private_constructor() {
        let table: TypeTable = serde_json::from_str(SAMPLE).unwrap();
        let strict = ReflectorConfig {
            allow_private_access: false,
        };
        let reports = inspect(vec![table], &["Kennel".to_string()], strict).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].default_constructor);
        assert!(reports[0].readable.iter().all(|p| p.name != "items"));
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let table: TypeTable = serde_json::from_str(SAMPLE).unwrap();
        let err = inspect(vec![table], &["Missing".to_string()], ReflectorConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_text_block_layout() {
        let reports = sample();
        let dog = find(&reports, "Dog").to_string();
        assert_eq!(
            dog,
            "Dog\n  default constructor: yes\n  \
             read  name: String (via Animal.getName)\n"
        );

        let text = render_text(&reports);
        assert!(text.starts_with("Animal\n"));
        assert!(text.contains(&dog));
    }

    #[test]
    fn test_json_output_shape() {
        let reports = sample();
        let json = serde_json::to_value(find(&reports, "Dog")).unwrap();
        assert_eq!(json["default_constructor"], true);
        assert_eq!(json["readable"][0]["type"], "String");
        assert!(json.get("error").is_none());
    }
}
