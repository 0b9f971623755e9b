//! Builds [`TypeMetadata`] for one type.
//!
//! Members are collected from the type, its interfaces and its superclasses,
//! classified into getters and setters by name, reduced to one accessor per
//! property, and topped up with fields for properties no accessor covers.

use std::collections::HashSet;

use indexmap::IndexMap;
use typelens_resolver::GenericResolver;
use typelens_types::{
    Member, MethodDescriptor, RawType, TypeExpr, TypeHandle, TypeUniverse, Visibility,
};

use crate::invoker::{DefaultConstructor, Invoker};
use crate::metadata::{Property, TypeMetadata};
use crate::{Error, Result, property};

/// Reflection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectorConfig {
    /// Treat non-public members as accessible. When off, non-public fields
    /// and constructors are not discovered, and non-public accessor methods
    /// are discovered but fail when invoked.
    pub allow_private_access: bool,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            allow_private_access: true,
        }
    }
}

/// De-duplication key for inherited methods: name plus erased signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<RawType>,
    pub returns: Option<RawType>,
}

impl MethodSignature {
    pub fn of(universe: &TypeUniverse, method: &MethodDescriptor) -> Self {
        Self {
            name: method.name.clone(),
            params: method.params.iter().map(|p| universe.erasure(p)).collect(),
            returns: method.returns.as_ref().map(|r| universe.erasure(r)),
        }
    }
}

type MethodMember<'u> = Member<'u, MethodDescriptor>;

// ============================================================================
// Conflict resolution
// ============================================================================

/// Choose between two getters for the same property.
///
/// The more specific return type wins. Two getters with the same type are
/// only allowed for `bool`, in which case the `is` form wins. Returns a
/// description of the clash when neither can be preferred.
pub fn pick_getter<'m>(
    universe: &TypeUniverse,
    winner: MethodMember<'m>,
    candidate: MethodMember<'m>,
) -> std::result::Result<MethodMember<'m>, String> {
    let winner_type = erased_return(universe, &winner);
    let candidate_type = erased_return(universe, &candidate);

    if candidate_type == winner_type {
        if candidate_type != RawType::Class(universe.boolean()) {
            return Err(clash(universe, "getters", &winner, &winner_type, &candidate, &candidate_type));
        }
        return Ok(if candidate.name.starts_with("is") {
            candidate
        } else {
            winner
        });
    }

    if universe.is_assignable_from(&candidate_type, &winner_type) {
        Ok(winner)
    } else if universe.is_assignable_from(&winner_type, &candidate_type) {
        Ok(candidate)
    } else {
        Err(clash(universe, "getters", &winner, &winner_type, &candidate, &candidate_type))
    }
}

/// Choose between the current setter (if any) and a candidate for the same
/// property. The more specific parameter type wins.
pub fn pick_setter<'m>(
    universe: &TypeUniverse,
    current: Option<MethodMember<'m>>,
    candidate: MethodMember<'m>,
) -> std::result::Result<MethodMember<'m>, String> {
    let Some(current) = current else {
        return Ok(candidate);
    };
    let current_type = erased_param(universe, &current);
    let candidate_type = erased_param(universe, &candidate);

    if universe.is_assignable_from(&current_type, &candidate_type) {
        Ok(candidate)
    } else if universe.is_assignable_from(&candidate_type, &current_type) {
        Ok(current)
    } else {
        Err(clash(universe, "setters", &current, &current_type, &candidate, &candidate_type))
    }
}

/// Void methods are never getters; they erase to `Object` here so the
/// comparison stays total.
fn erased_return(universe: &TypeUniverse, method: &MethodMember<'_>) -> RawType {
    method
        .returns
        .as_ref()
        .map_or(RawType::Class(universe.object()), |ty| universe.erasure(ty))
}

fn erased_param(universe: &TypeUniverse, method: &MethodMember<'_>) -> RawType {
    method
        .params
        .first()
        .map_or(RawType::Class(universe.object()), |ty| universe.erasure(ty))
}

fn clash(
    universe: &TypeUniverse,
    kind: &str,
    a: &MethodMember<'_>,
    a_type: &RawType,
    b: &MethodMember<'_>,
    b_type: &RawType,
) -> String {
    format!(
        "{} `{}.{}` ({}) and `{}.{}` ({}) have unrelated types",
        kind,
        universe.name(a.declaring),
        a.name,
        universe.display_raw(a_type),
        universe.name(b.declaring),
        b.name,
        universe.display_raw(b_type),
    )
}

// ============================================================================
// Reflector
// ============================================================================

/// Builds metadata records. Stateless apart from its configuration; the
/// factory owns caching.
#[derive(Debug, Clone, Copy)]
pub struct Reflector<'u> {
    universe: &'u TypeUniverse,
    resolver: GenericResolver<'u>,
    config: ReflectorConfig,
}

impl<'u> Reflector<'u> {
    pub fn new(universe: &'u TypeUniverse, config: ReflectorConfig) -> Self {
        Self {
            universe,
            resolver: GenericResolver::new(universe),
            config,
        }
    }

    /// Reflect `handle` from scratch.
    pub fn build(&self, handle: TypeHandle) -> Result<TypeMetadata> {
        let class = self
            .universe
            .class(handle)
            .ok_or(Error::UnknownType(handle))?;
        let src = TypeExpr::class(handle);
        let methods = self.class_methods(handle);

        let mut readable = IndexMap::new();
        let mut writable = IndexMap::new();
        self.add_getters(&class.name, &src, &methods, &mut readable)?;
        self.add_setters(&class.name, &src, &methods, &readable, &mut writable)?;
        self.add_fields(handle, &src, &mut readable, &mut writable);
        let default_constructor = self.default_constructor(handle);

        log::debug!(
            "reflected {}: {} readable, {} writable, default constructor: {}",
            class.name,
            readable.len(),
            writable.len(),
            default_constructor.is_some()
        );
        Ok(TypeMetadata::new(
            handle,
            class.name.clone(),
            readable,
            writable,
            default_constructor,
        ))
    }

    fn accessible(&self, visibility: Visibility) -> bool {
        self.config.allow_private_access || visibility.is_public()
    }

    // ========================================================================
    // Member enumeration
    // ========================================================================

    /// Methods of `handle`, its interfaces and its superclasses (stopping at
    /// `Object`), first declaration of each signature wins.
    fn class_methods(&self, handle: TypeHandle) -> Vec<MethodMember<'u>> {
        let u = self.universe;
        let mut seen = HashSet::new();
        let mut visited = HashSet::new();
        let mut methods = Vec::new();

        let mut current = Some(handle);
        while let Some(class) = current.filter(|c| *c != u.object()) {
            self.add_unique_methods(class, &mut seen, &mut methods);
            for interface in u.interfaces(class) {
                self.add_interface_methods(interface, &mut visited, &mut seen, &mut methods);
            }
            current = u.superclass(class);
        }
        methods
    }

    fn add_interface_methods(
        &self,
        interface: TypeHandle,
        visited: &mut HashSet<TypeHandle>,
        seen: &mut HashSet<MethodSignature>,
        methods: &mut Vec<MethodMember<'u>>,
    ) {
        if !visited.insert(interface) {
            return;
        }
        self.add_unique_methods(interface, seen, methods);
        for parent in self.universe.interfaces(interface) {
            self.add_interface_methods(parent, visited, seen, methods);
        }
    }

    fn add_unique_methods(
        &self,
        class: TypeHandle,
        seen: &mut HashSet<MethodSignature>,
        methods: &mut Vec<MethodMember<'u>>,
    ) {
        for method in self.universe.declared_methods(class) {
            if method.synthetic {
                continue;
            }
            if seen.insert(MethodSignature::of(self.universe, &method)) {
                methods.push(method);
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    fn add_getters(
        &self,
        type_name: &str,
        src: &TypeExpr,
        methods: &[MethodMember<'u>],
        readable: &mut IndexMap<String, Property>,
    ) -> Result<()> {
        let mut conflicting: IndexMap<String, Vec<MethodMember<'u>>> = IndexMap::new();
        for method in methods {
            if !method.params.is_empty()
                || method.returns.is_none()
                || !property::is_getter(&method.name)
            {
                continue;
            }
            if let Some(name) = property::method_to_property(&method.name) {
                conflicting.entry(name).or_default().push(*method);
            }
        }

        for (name, candidates) in conflicting {
            let mut candidates = candidates.into_iter();
            let Some(first) = candidates.next() else {
                continue;
            };
            let winner = candidates
                .try_fold(first, |winner, candidate| {
                    pick_getter(self.universe, winner, candidate)
                })
                .map_err(|detail| Error::AmbiguousAccessor {
                    type_name: type_name.to_string(),
                    property: name.clone(),
                    detail,
                })?;

            if !property::is_valid_property_name(&name) {
                continue;
            }
            let Some(generic) = self.resolver.resolve_return_type(winner, src) else {
                continue;
            };
            log::trace!("{}.{} read through {}", type_name, name, winner.name);
            readable.insert(name, self.method_property(winner, generic));
        }
        Ok(())
    }

    fn add_setters(
        &self,
        type_name: &str,
        src: &TypeExpr,
        methods: &[MethodMember<'u>],
        readable: &IndexMap<String, Property>,
        writable: &mut IndexMap<String, Property>,
    ) -> Result<()> {
        let mut conflicting: IndexMap<String, Vec<MethodMember<'u>>> = IndexMap::new();
        for method in methods {
            if method.params.len() != 1 || !property::is_setter(&method.name) {
                continue;
            }
            if let Some(name) = property::method_to_property(&method.name) {
                conflicting.entry(name).or_default().push(*method);
            }
        }

        for (name, candidates) in conflicting {
            let getter_type = readable.get(&name).map(|p| &p.raw);
            let mut matched = None;
            let mut failure = None;

            for setter in candidates {
                let param = erased_param(self.universe, &setter);
                if getter_type == Some(&param) {
                    matched = Some(setter);
                    break;
                }
                // After the first clash only an exact getter match can win.
                if failure.is_none() {
                    match pick_setter(self.universe, matched, setter) {
                        Ok(better) => matched = Some(better),
                        Err(detail) => {
                            log::trace!("{}.{}: {}", type_name, name, detail);
                            matched = None;
                            failure = Some(detail);
                        }
                    }
                }
            }

            let Some(setter) = matched else {
                return Err(Error::AmbiguousAccessor {
                    type_name: type_name.to_string(),
                    property: name,
                    detail: failure.unwrap_or_default(),
                });
            };

            if !property::is_valid_property_name(&name) {
                continue;
            }
            let Some(generic) = self
                .resolver
                .resolve_param_types(setter, src)
                .into_iter()
                .next()
            else {
                continue;
            };
            log::trace!("{}.{} written through {}", type_name, name, setter.name);
            writable.insert(name, self.method_property(setter, generic));
        }
        Ok(())
    }

    fn method_property(&self, method: MethodMember<'u>, generic: TypeExpr) -> Property {
        let owner = self.universe.name(method.declaring);
        Property {
            invoker: Invoker::method(owner, &method, self.accessible(method.visibility)),
            raw: self.universe.erasure(&generic),
            generic,
        }
    }

    // ========================================================================
    // Fields and constructors
    // ========================================================================

    /// Fields of `handle` and its superclasses for properties no accessor
    /// covers. Constants are never properties.
    fn add_fields(
        &self,
        handle: TypeHandle,
        src: &TypeExpr,
        readable: &mut IndexMap<String, Property>,
        writable: &mut IndexMap<String, Property>,
    ) {
        let u = self.universe;
        let mut current = Some(handle);
        while let Some(class) = current {
            for field in u.declared_fields(class) {
                if !self.accessible(field.visibility)
                    || (field.is_static && field.is_final)
                    || !property::is_valid_property_name(&field.name)
                {
                    continue;
                }
                let owner = u.name(field.declaring);
                let generic = self.resolver.resolve_field_type(field, src);
                let raw = u.erasure(&generic);

                if !writable.contains_key(&field.name) {
                    writable.insert(
                        field.name.clone(),
                        Property {
                            invoker: Invoker::field_writer(owner, &field),
                            generic: generic.clone(),
                            raw: raw.clone(),
                        },
                    );
                }
                if !readable.contains_key(&field.name) {
                    readable.insert(
                        field.name.clone(),
                        Property {
                            invoker: Invoker::field_reader(owner, &field),
                            generic,
                            raw,
                        },
                    );
                }
            }
            current = u.superclass(class);
        }
    }

    fn default_constructor(&self, handle: TypeHandle) -> Option<DefaultConstructor> {
        self.universe
            .declared_constructors(handle)
            .find(|c| c.params.is_empty() && self.accessible(c.visibility))
            .map(|c| DefaultConstructor::new(self.universe.name(handle), c.body.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Access, InvokeError};
    use typelens_types::{
        ClassDef, ConstructorDef, FieldDef, MethodDef, SetterBody, UniverseBuilder,
    };

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Record {
        name: String,
    }

    fn universe() -> TypeUniverse {
        UniverseBuilder::new()
            .add(ClassDef::class("Animal"))
            .add(ClassDef::class("Dog").extends("Animal"))
            .add(
                ClassDef::class("Flags")
                    .getter("getActive", "bool")
                    .getter("isActive", "bool")
                    .getter("isVisible", "bool")
                    .getter("getVisible", "bool"),
            )
            .add(
                ClassDef::class("Owner")
                    .getter("getPet", "Animal")
                    .setter("setPet", "Animal"),
            )
            .add(ClassDef::class("DogOwner").extends("Owner").getter("getPet", "Dog"))
            .add(
                ClassDef::class("Broken")
                    .getter("getValue", "i32")
                    .getter("getValue", "String"),
            )
            .add(
                ClassDef::class("Container")
                    .type_param("E")
                    .getter("getItem", "E")
                    .setter("setItem", "E")
                    .field(FieldDef::new("items", "Vec<E>").visibility(Visibility::Private)),
            )
            .add(ClassDef::class("StringContainer").extends("Container<String>"))
            .add(
                ClassDef::class("Kennel")
                    .bounded_type_param("A", &["Animal"])
                    .extends("Container<A>"),
            )
            .add(
                ClassDef::class("Record")
                    .field(FieldDef::new("name", "String").visibility(Visibility::Private))
                    .constant("MAX_LENGTH", "i32")
                    .field(FieldDef::new("instances", "i64").set_static())
                    .field(FieldDef::new("serialVersionUID", "i64"))
                    .field(FieldDef::new("$jacocoData", "bool"))
                    .getter("getClass", "Object")
                    .default_constructor_with(|| Ok(Box::new(Record::default())))
                    .bind_field(
                        "name",
                        |target| {
                            let record = target.downcast_ref::<Record>().ok_or("not a Record")?;
                            Ok(Box::new(record.name.clone()))
                        },
                        Some(SetterBody::new(|target, value| {
                            let record = target.downcast_mut::<Record>().ok_or("not a Record")?;
                            record.name = *value.downcast::<String>().map_err(|_| "not a String")?;
                            Ok(())
                        })),
                    ),
            )
            .add(ClassDef::class("Audit").extends("Record").getter("getName", "String"))
            .add(ClassDef::class("Singleton").constructor(ConstructorDef {
                visibility: Visibility::Private,
                ..ConstructorDef::default()
            }))
            .add(ClassDef::interface("HasId").getter("getId", "i64"))
            .add(
                ClassDef::interface("Named")
                    .implements("HasId")
                    .getter("getName", "String"),
            )
            .add(ClassDef::class("Person").implements("Named"))
            .add(
                ClassDef::class("Bridged")
                    .method(MethodDef::new("getValue").returns("i32").synthetic())
                    .getter("getValue", "String"),
            )
            .add(
                ClassDef::class("Secretive")
                    .method(
                        MethodDef::new("getCode")
                            .returns("String")
                            .visibility(Visibility::Private),
                    ),
            )
            .add(
                ClassDef::class("Overloaded")
                    .getter("getPet", "Dog")
                    .setter("setPet", "Animal")
                    .setter("setPet", "Dog"),
            )
            .add(
                ClassDef::class("Clashing")
                    .setter("setId", "String")
                    .setter("setId", "i32"),
            )
            .add(
                ClassDef::class("Recovering")
                    .getter("getPet", "Dog")
                    .setter("setPet", "String")
                    .setter("setPet", "i32")
                    .setter("setPet", "Dog"),
            )
            .build()
            .unwrap()
    }

    fn reflect(u: &TypeUniverse, name: &str) -> Result<TypeMetadata> {
        Reflector::new(u, ReflectorConfig::default()).build(u.lookup(name).unwrap())
    }

    fn names<'a>(it: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
        let mut names: Vec<_> = it.collect();
        names.sort();
        names
    }

    fn raw(u: &TypeUniverse, name: &str) -> RawType {
        RawType::Class(u.lookup(name).unwrap())
    }

    // ========================================================================
    // Pairwise picks
    // ========================================================================

    fn method<'u>(u: &'u TypeUniverse, class: &str, name: &str, index: usize) -> MethodMember<'u> {
        u.declared_methods(u.lookup(class).unwrap())
            .filter(|m| m.name == name)
            .nth(index)
            .unwrap()
    }

    #[test]
    fn test_pick_getter_prefers_is_for_booleans() {
        let u = universe();
        let get = method(&u, "Flags", "getActive", 0);
        let is = method(&u, "Flags", "isActive", 0);
        assert_eq!(pick_getter(&u, get, is).unwrap().name, "isActive");
        assert_eq!(pick_getter(&u, is, get).unwrap().name, "isActive");
    }

    #[test]
    fn test_pick_getter_prefers_narrower_type() {
        let u = universe();
        let dog = method(&u, "DogOwner", "getPet", 0);
        let animal = method(&u, "Owner", "getPet", 0);
        assert_eq!(pick_getter(&u, dog, animal).unwrap().declaring, dog.declaring);
        assert_eq!(pick_getter(&u, animal, dog).unwrap().declaring, dog.declaring);
    }

    #[test]
    fn test_pick_getter_rejects_unrelated_types() {
        let u = universe();
        let int = method(&u, "Broken", "getValue", 0);
        let string = method(&u, "Broken", "getValue", 1);
        let detail = pick_getter(&u, int, string).unwrap_err();
        assert!(detail.contains("i32"));
        assert!(detail.contains("String"));
    }

    #[test]
    fn test_pick_setter() {
        let u = universe();
        let animal = method(&u, "Overloaded", "setPet", 0);
        let dog = method(&u, "Overloaded", "setPet", 1);
        assert_eq!(pick_setter(&u, None, animal).unwrap().params, animal.params);
        assert_eq!(pick_setter(&u, Some(animal), dog).unwrap().params, dog.params);
        assert_eq!(pick_setter(&u, Some(dog), animal).unwrap().params, dog.params);

        let string = method(&u, "Clashing", "setId", 0);
        let int = method(&u, "Clashing", "setId", 1);
        assert!(pick_setter(&u, Some(string), int).is_err());
    }

    // ========================================================================
    // Full builds
    // ========================================================================

    #[test]
    fn test_boolean_getters_resolve_to_is() {
        let u = universe();
        let flags = reflect(&u, "Flags").unwrap();
        assert_eq!(flags.read_invoker("active").unwrap().member(), "Flags.isActive");
        assert_eq!(flags.read_invoker("visible").unwrap().member(), "Flags.isVisible");
        assert_eq!(names(flags.readable_properties()), vec!["active", "visible"]);
    }

    #[test]
    fn test_covariant_getter_narrows() {
        let u = universe();
        let owner = reflect(&u, "DogOwner").unwrap();
        assert_eq!(owner.read_type("pet").unwrap(), &raw(&u, "Dog"));
        assert_eq!(owner.write_type("pet").unwrap(), &raw(&u, "Animal"));
    }

    #[test]
    fn test_unrelated_getters_are_ambiguous() {
        let u = universe();
        let err = reflect(&u, "Broken").unwrap_err();
        assert!(matches!(
            err,
            Error::AmbiguousAccessor { ref type_name, ref property, .. }
                if type_name == "Broken" && property == "value"
        ));
    }

    #[test]
    fn test_generic_property_types() {
        let u = universe();

        let strings = reflect(&u, "StringContainer").unwrap();
        assert_eq!(strings.read_type("item").unwrap(), &raw(&u, "String"));
        assert_eq!(strings.write_type("item").unwrap(), &raw(&u, "String"));
        assert_eq!(
            u.display(strings.read_generic_type("items").unwrap()).to_string(),
            "Vec<String>"
        );
        assert_eq!(strings.read_type("items").unwrap(), &raw(&u, "Vec"));

        let container = reflect(&u, "Container").unwrap();
        assert_eq!(container.read_type("item").unwrap(), &RawType::Class(u.object()));

        let kennel = reflect(&u, "Kennel").unwrap();
        assert_eq!(kennel.read_type("item").unwrap(), &raw(&u, "Animal"));
    }

    #[test]
    fn test_setter_matching_getter_type_wins() {
        let u = universe();
        let meta = reflect(&u, "Overloaded").unwrap();
        assert_eq!(meta.write_type("pet").unwrap(), &raw(&u, "Dog"));
    }

    #[test]
    fn test_unrelated_setters_are_ambiguous() {
        let u = universe();
        let err = reflect(&u, "Clashing").unwrap_err();
        assert!(matches!(err, Error::AmbiguousAccessor { ref property, .. } if property == "id"));
    }

    #[test]
    fn test_exact_setter_overrides_earlier_clash() {
        let u = universe();
        let meta = reflect(&u, "Recovering").unwrap();
        assert_eq!(meta.write_type("pet").unwrap(), &raw(&u, "Dog"));
    }

    #[test]
    fn test_fields_constants_and_denylist() {
        let u = universe();
        let record = reflect(&u, "Record").unwrap();

        assert_eq!(names(record.readable_properties()), vec!["instances", "name"]);
        assert_eq!(names(record.writable_properties()), vec!["instances", "name"]);
        assert!(!record.has_getter("MAX_LENGTH"));
        assert!(!record.has_setter("MAX_LENGTH"));
        assert!(!record.has_getter("class"));
        assert!(!record.has_getter("serialVersionUID"));
        assert!(matches!(
            record.read_type("MAX_LENGTH"),
            Err(Error::NoSuchProperty { access: Access::Read, .. })
        ));
    }

    #[test]
    fn test_accessor_shadows_inherited_field() {
        let u = universe();
        let audit = reflect(&u, "Audit").unwrap();
        assert!(!audit.read_invoker("name").unwrap().is_field());
        assert!(audit.write_invoker("name").unwrap().is_field());
        assert_eq!(audit.write_invoker("name").unwrap().member(), "Record.name");
    }

    #[test]
    fn test_field_invokers_through_metadata() {
        let u = universe();
        let meta = reflect(&u, "Record").unwrap();

        let instance = meta.default_constructor().unwrap().new_instance().unwrap();
        let mut record = *instance.downcast::<Record>().unwrap();
        meta.write_invoker("name")
            .unwrap()
            .invoke_set(&mut record, Box::new("Ada".to_string()))
            .unwrap();
        let name = meta.read_invoker("name").unwrap().invoke_get(&record).unwrap();
        assert_eq!(*name.downcast::<String>().unwrap(), "Ada");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let u = universe();
        let meta = reflect(&u, "Record").unwrap();
        for name in meta.readable_properties() {
            assert_eq!(meta.find_property_name(&name.to_uppercase()), Some(name));
        }
        assert_eq!(meta.find_property_name("NaMe"), Some("name"));
        assert_eq!(meta.find_property_name("missing"), None);
    }

    #[test]
    fn test_default_constructor_presence() {
        let u = universe();
        assert!(reflect(&u, "Record").unwrap().has_default_constructor());

        let flags = reflect(&u, "Flags").unwrap();
        assert!(matches!(
            flags.default_constructor(),
            Err(Error::NoDefaultConstructor { ref type_name }) if type_name == "Flags"
        ));

        assert!(reflect(&u, "Singleton").unwrap().has_default_constructor());
        let strict = ReflectorConfig {
            allow_private_access: false,
        };
        let singleton = Reflector::new(&u, strict)
            .build(u.lookup("Singleton").unwrap())
            .unwrap();
        assert!(!singleton.has_default_constructor());
    }

    #[test]
    fn test_interface_methods_are_inherited() {
        let u = universe();
        let person = reflect(&u, "Person").unwrap();
        assert_eq!(names(person.readable_properties()), vec!["id", "name"]);
        assert_eq!(person.read_type("id").unwrap(), &raw(&u, "i64"));

        let named = reflect(&u, "Named").unwrap();
        assert!(named.has_getter("id"));
    }

    #[test]
    fn test_synthetic_methods_are_skipped() {
        let u = universe();
        let bridged = reflect(&u, "Bridged").unwrap();
        assert_eq!(bridged.read_type("value").unwrap(), &raw(&u, "String"));
    }

    #[test]
    fn test_private_access_switch() {
        let u = universe();
        let strict = Reflector::new(
            &u,
            ReflectorConfig {
                allow_private_access: false,
            },
        );

        let record = strict.build(u.lookup("Record").unwrap()).unwrap();
        assert!(!record.has_getter("name"));
        assert!(record.has_getter("instances"));

        let secretive = strict.build(u.lookup("Secretive").unwrap()).unwrap();
        let invoker = secretive.read_invoker("code").unwrap();
        assert!(matches!(
            invoker.invoke_get(&()),
            Err(InvokeError::IllegalAccess { .. })
        ));
    }

    #[test]
    fn test_unknown_handle() {
        let small = UniverseBuilder::new().build().unwrap();
        let large = universe();
        let foreign = large.lookup("Recovering").unwrap();
        assert!(matches!(
            Reflector::new(&small, ReflectorConfig::default()).build(foreign),
            Err(Error::UnknownType(h)) if h == foreign
        ));
    }
}
