//! The generic converter.
//!
//! [`Converter`] resolves a bean tag through its [`BeanRegistry`], checks the
//! supplied instances against the descriptor and hands a
//! [`ConversionRequest`] to the descriptor's build function. Builders use the
//! request to fetch their primary instance and to route relationships into
//! slots; relationships with no slot are handled according to the
//! converter's [`UnmatchedRelationshipPolicy`].

use std::slice;

use tracing::{debug, warn};

use openmeta_core::enums::UnmatchedRelationshipPolicy;
use openmeta_core::instance::{EntityDetail, InstanceCategory, Relationship};

use crate::beans::Bean;
use crate::error::{ConversionContext, ConvertError, Result};
use crate::registry::{BeanDescriptor, BeanRegistry, InputShape, RelationshipSlot};

/// Relationships supplied alongside the primary entity.
#[derive(Debug, Clone, Copy, Default)]
pub enum Related<'a> {
    #[default]
    None,
    One(&'a Relationship),
    Many(&'a [Relationship]),
}

impl<'a> Related<'a> {
    fn as_slice(self) -> &'a [Relationship] {
        match self {
            Self::None => &[],
            Self::One(relationship) => slice::from_ref(relationship),
            Self::Many(relationships) => relationships,
        }
    }
}

/// Everything a build function sees.
#[derive(Debug)]
pub struct ConversionRequest<'a> {
    descriptor: &'a BeanDescriptor,
    entity: Option<&'a EntityDetail>,
    relationships: &'a [Relationship],
    context: &'a ConversionContext,
    policy: UnmatchedRelationshipPolicy,
}

impl<'a> ConversionRequest<'a> {
    pub fn bean_class(&self) -> &'static str {
        self.descriptor.bean_class
    }

    pub fn context(&self) -> &'a ConversionContext {
        self.context
    }

    pub fn entity(&self) -> Option<&'a EntityDetail> {
        self.entity
    }

    /// The entity, or `MissingInstance` if none was supplied.
    pub fn require_entity(&self) -> Result<&'a EntityDetail> {
        self.entity.ok_or_else(|| {
            ConvertError::missing_instance(self.bean_class(), InstanceCategory::Entity, self.context)
        })
    }

    pub fn relationships(&self) -> &'a [Relationship] {
        self.relationships
    }

    /// The first relationship, or `MissingInstance` if none was supplied.
    pub fn require_relationship(&self) -> Result<&'a Relationship> {
        self.relationships.first().ok_or_else(|| {
            ConvertError::missing_instance(
                self.bean_class(),
                InstanceCategory::Relationship,
                self.context,
            )
        })
    }

    /// Routes each relationship to the first slot it fits: the type name
    /// matches its type or one of its super types, and the entity is at the
    /// slot's end.
    ///
    /// Input order is preserved. Relationships that fit no slot, including
    /// those holding the entity at the other end, are handled by the
    /// unmatched relationship policy.
    pub fn route<S: Copy>(
        &self,
        routes: &[(RelationshipSlot, S)],
    ) -> Result<Vec<(S, &'a Relationship)>> {
        let mut routed = Vec::with_capacity(self.relationships.len());
        let entity_guid = self.entity.map(EntityDetail::guid);
        for relationship in self.relationships {
            let fitting = routes.iter().find(|(slot, _)| match entity_guid {
                Some(guid) => slot.fits(relationship, guid),
                None => relationship.header.instance_type.is_type_of(slot.type_name),
            });
            match fitting {
                Some((slot, route)) => {
                    debug!(
                        relationship = relationship.guid(),
                        slot = slot.type_name,
                        bean_class = self.bean_class(),
                        "routed relationship"
                    );
                    routed.push((*route, relationship));
                }
                None => self.unmatched(relationship)?,
            }
        }
        Ok(routed)
    }

    /// Routes relationships into a single slot. The first fit wins; later
    /// fits are skipped.
    pub fn route_single(&self, slot: RelationshipSlot) -> Result<Option<&'a Relationship>> {
        let mut matches = self.route(&[(slot, ())])?.into_iter().map(|(_, r)| r);
        let first = matches.next();
        for extra in matches {
            debug!(
                relationship = extra.guid(),
                slot = slot.type_name,
                bean_class = self.bean_class(),
                "slot already filled, skipping relationship"
            );
        }
        Ok(first)
    }

    /// Applies the unmatched relationship policy to `relationship`.
    pub fn unmatched(&self, relationship: &Relationship) -> Result<()> {
        let relationship_type = relationship.header.type_name();
        match self.policy {
            UnmatchedRelationshipPolicy::Ignore => {
                debug!(
                    relationship = relationship.guid(),
                    relationship_type,
                    bean_class = self.bean_class(),
                    "ignoring relationship with no slot"
                );
                Ok(())
            }
            UnmatchedRelationshipPolicy::Warn => {
                warn!(
                    relationship = relationship.guid(),
                    relationship_type,
                    bean_class = self.bean_class(),
                    context = %self.context,
                    "relationship has no slot in bean, skipping"
                );
                Ok(())
            }
            UnmatchedRelationshipPolicy::Reject => Err(ConvertError::UnrecognizedRelationshipType {
                bean_class: self.bean_class().to_owned(),
                relationship_type: relationship_type.to_owned(),
                guid: relationship.guid().to_owned(),
                context: self.context.clone(),
            }),
        }
    }
}

/// Builds typed beans from generic instances.
///
/// A converter holds no per-call state; every method takes `&self`.
#[derive(Debug, Clone)]
pub struct Converter {
    registry: BeanRegistry,
    policy: UnmatchedRelationshipPolicy,
    strict_types: bool,
}

impl Default for Converter {
    fn default() -> Self {
        Self::standard()
    }
}

impl Converter {
    pub fn new(registry: BeanRegistry) -> Self {
        Self {
            registry,
            policy: UnmatchedRelationshipPolicy::default(),
            strict_types: false,
        }
    }

    /// A converter for every built-in bean kind.
    pub fn standard() -> Self {
        Self::new(BeanRegistry::standard())
    }

    pub fn with_policy(mut self, policy: UnmatchedRelationshipPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// When set, entities must be of the bean's entity type or a subtype.
    pub fn with_strict_types(mut self, strict_types: bool) -> Self {
        self.strict_types = strict_types;
        self
    }

    pub fn registry(&self) -> &BeanRegistry {
        &self.registry
    }

    pub fn policy(&self) -> UnmatchedRelationshipPolicy {
        self.policy
    }

    pub fn strict_types(&self) -> bool {
        self.strict_types
    }

    /// Builds the bean named by `tag` from whatever instances are supplied.
    ///
    /// The input shape is not checked; the builder fails with
    /// `MissingInstance` if its primary instance is absent.
    pub fn convert(
        &self,
        tag: &str,
        entity: Option<&EntityDetail>,
        related: Related<'_>,
        context: &ConversionContext,
    ) -> Result<Bean> {
        let descriptor = self.registry.lookup(tag, context)?;
        self.build(descriptor, entity, related.as_slice(), context)
    }

    /// Builds an entity-based bean with no relationships.
    pub fn convert_entity(
        &self,
        tag: &str,
        entity: Option<&EntityDetail>,
        context: &ConversionContext,
    ) -> Result<Bean> {
        self.convert_from_entity(tag, entity, Related::None, context)
    }

    /// Builds an entity-based bean with one supporting relationship.
    pub fn convert_with_relationship(
        &self,
        tag: &str,
        entity: Option<&EntityDetail>,
        relationship: Option<&Relationship>,
        context: &ConversionContext,
    ) -> Result<Bean> {
        let related = relationship.map_or(Related::None, Related::One);
        self.convert_from_entity(tag, entity, related, context)
    }

    /// Builds an entity-based bean with a list of supporting relationships.
    pub fn convert_with_relationships(
        &self,
        tag: &str,
        entity: Option<&EntityDetail>,
        relationships: &[Relationship],
        context: &ConversionContext,
    ) -> Result<Bean> {
        self.convert_from_entity(tag, entity, Related::Many(relationships), context)
    }

    /// Builds a relationship-based bean, optionally seen from `entity`.
    pub fn convert_relationship(
        &self,
        tag: &str,
        entity: Option<&EntityDetail>,
        relationship: Option<&Relationship>,
        context: &ConversionContext,
    ) -> Result<Bean> {
        let descriptor = self.registry.lookup(tag, context)?;
        if descriptor.input != InputShape::Relationship {
            return Err(ConvertError::invalid_bean_class(
                descriptor.bean_class,
                "bean is built from an entity, not a relationship",
                context,
            ));
        }
        let related = relationship.map_or(&[][..], slice::from_ref);
        self.build(descriptor, entity, related, context)
    }

    fn convert_from_entity(
        &self,
        tag: &str,
        entity: Option<&EntityDetail>,
        related: Related<'_>,
        context: &ConversionContext,
    ) -> Result<Bean> {
        let descriptor = self.registry.lookup(tag, context)?;
        if descriptor.input == InputShape::Relationship {
            return Err(ConvertError::invalid_bean_class(
                descriptor.bean_class,
                "bean is built from a relationship, not an entity",
                context,
            ));
        }
        self.build(descriptor, entity, related.as_slice(), context)
    }

    fn build(
        &self,
        descriptor: &BeanDescriptor,
        entity: Option<&EntityDetail>,
        relationships: &[Relationship],
        context: &ConversionContext,
    ) -> Result<Bean> {
        if self.strict_types {
            if let (Some(expected), Some(entity)) = (descriptor.entity_type, entity) {
                let instance_type = &entity.header.instance_type;
                if !instance_type.is_type_of(expected) {
                    return Err(ConvertError::UnexpectedElementType {
                        bean_class: descriptor.bean_class.to_owned(),
                        expected: expected.to_owned(),
                        actual: instance_type.type_def_name.clone(),
                        guid: entity.guid().to_owned(),
                        context: context.clone(),
                    });
                }
            }
        }

        if let Some(entity) = entity {
            if let Some(detached) = relationships.iter().find(|r| !r.touches(entity.guid())) {
                return Err(ConvertError::detached_relationship(
                    descriptor.bean_class,
                    detached,
                    entity.guid(),
                    context,
                ));
            }
        }

        let request = ConversionRequest {
            descriptor,
            entity,
            relationships,
            context,
            policy: self.policy,
        };

        // Beans without relationship slots still see what they were given.
        if descriptor.input == InputShape::Entity {
            for relationship in relationships {
                request.unmatched(relationship)?;
            }
        }

        let bean = (descriptor.build)(&request)?;
        debug!(
            bean_class = descriptor.bean_class,
            guid = bean.guid(),
            context = %context,
            "converted bean"
        );
        Ok(bean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use openmeta_core::instance::{EntityProxy, InstanceType, QUALIFIED_NAME};
    use openmeta_core::property::{InstanceProperties, PropertyValue};
    use pretty_assertions::assert_eq;

    use crate::beans::{ActivityStatus, BeanKind, MembershipStatus, ToDoStatus};

    fn ctx() -> ConversionContext {
        ConversionContext::new("test-service", "convert")
    }

    fn entity(guid: &str, type_name: &str, supers: &[&str]) -> EntityDetail {
        EntityDetail::new(
            guid,
            InstanceType::new(type_name).with_super_types(supers.iter().copied()),
        )
    }

    fn proxy(guid: &str, type_name: &str, qualified_name: &str) -> EntityProxy {
        let mut proxy = EntityProxy::new(guid, InstanceType::new(type_name));
        proxy
            .unique_properties
            .insert(QUALIFIED_NAME, PropertyValue::from(qualified_name));
        proxy
    }

    fn relationship(guid: &str, type_name: &str, one: EntityProxy, two: EntityProxy) -> Relationship {
        Relationship::new(guid, InstanceType::new(type_name), one, two)
    }

    fn term() -> EntityDetail {
        entity("term-1", "GlossaryTerm", &["Referenceable"]).with_properties(
            InstanceProperties::new()
                .with("qualifiedName", "x")
                .with("displayName", "y")
                .with("customField", "z"),
        )
    }

    fn todo() -> EntityDetail {
        entity("todo-1", "ToDo", &["Referenceable"]).with_properties(
            InstanceProperties::new()
                .with(QUALIFIED_NAME, "todo::review")
                .with("name", "Review schema")
                .with("priority", 2i32)
                .with("toDoStatus", PropertyValue::enumeration(1, "IN_PROGRESS"))
                .with(
                    "dueTime",
                    Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap(),
                ),
        )
    }

    fn todo_end() -> EntityProxy {
        proxy("todo-1", "ToDo", "todo::review")
    }

    #[test]
    fn glossary_term_splits_known_and_extended() {
        let bean = Converter::standard()
            .convert_entity("glossary-term", Some(&term()), &ctx())
            .unwrap();

        let Bean::GlossaryTerm(element) = &bean else {
            panic!("expected a glossary term, got {:?}", bean.kind());
        };
        assert_eq!(element.properties.base.qualified_name.as_deref(), Some("x"));
        assert_eq!(element.properties.display_name.as_deref(), Some("y"));
        assert_eq!(element.properties.summary, None);
        assert_eq!(element.properties.base.extended_properties.len(), 1);
        assert_eq!(
            element.properties.base.extended_properties.get("customField"),
            Some(&PropertyValue::from("z"))
        );
        assert_eq!(element.header.guid, "term-1");
        assert_eq!(element.header.element_type.type_name, "GlossaryTerm");
    }

    #[test]
    fn known_property_never_reaches_extended() {
        let bean = Converter::standard()
            .convert_entity("glossary-term", Some(&term()), &ctx())
            .unwrap();
        let extended = bean.extended_properties();
        assert!(!extended.contains_key("qualifiedName"));
        assert!(!extended.contains_key("displayName"));
    }

    #[test]
    fn wrong_type_lands_in_extended() {
        let entity = entity("asset-1", "Asset", &["Referenceable"]).with_properties(
            InstanceProperties::new()
                .with("name", 42i32)
                .with("description", "db"),
        );
        let bean = Converter::standard()
            .convert_entity("asset", Some(&entity), &ctx())
            .unwrap();
        let Bean::Asset(asset) = &bean else {
            panic!("expected an asset");
        };
        assert_eq!(asset.properties.name, None);
        assert_eq!(asset.properties.description.as_deref(), Some("db"));
        assert_eq!(bean.extended_properties().get("name"), Some(&PropertyValue::Int(42)));
    }

    #[test]
    fn round_trip_reproduces_entity_properties() {
        let mut properties = todo().properties;
        properties.effective_from_time = Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        properties.insert("additionalProperties", PropertyValue::string_map([("team", "data")]));
        properties.insert("unmodelled", PropertyValue::Long(7));
        properties.insert("toDoStatus", PropertyValue::enumeration(3, "IN_PROGRESS"));
        let source = entity("todo-1", "ToDo", &[]).with_properties(properties.clone());

        let bean = Converter::standard()
            .convert_entity("action", Some(&source), &ctx())
            .unwrap();
        assert_eq!(bean.to_instance_properties(), properties);
        assert_eq!(source.properties, properties);
    }

    #[test]
    fn every_entity_kind_round_trips() {
        let converter = Converter::standard();
        let source = entity("e-1", "Asset", &["Referenceable"]).with_properties(
            InstanceProperties::new()
                .with(QUALIFIED_NAME, "e::1")
                .with("name", "n")
                .with("description", "d")
                .with("emoji", 3i32)
                .with("collectionType", "folder")
                .with("other", true),
        );
        for kind in BeanKind::ALL {
            if *kind == BeanKind::RelatedElement {
                continue;
            }
            let bean = converter.convert_entity(kind.tag(), Some(&source), &ctx()).unwrap();
            assert_eq!(bean.kind(), *kind);
            assert_eq!(bean.to_instance_properties(), source.properties, "{kind}");
        }
    }

    #[test]
    fn conversion_is_deterministic() {
        let converter = Converter::standard();
        let first = converter.convert_entity("glossary-term", Some(&term()), &ctx()).unwrap();
        let second = converter.convert_entity("glossary-term", Some(&term()), &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_entity_is_missing_instance() {
        let err = Converter::standard()
            .convert_entity("asset", None, &ctx())
            .unwrap_err();
        assert!(err.is_missing_instance());
        assert_eq!(err.bean_class(), "AssetElement");
        assert_eq!(err.context(), &ctx());
        assert!(matches!(
            err,
            ConvertError::MissingInstance {
                category: InstanceCategory::Entity,
                ..
            }
        ));
    }

    #[test]
    fn missing_relationship_is_missing_instance() {
        let err = Converter::standard()
            .convert_relationship("related-element", None, None, &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingInstance {
                category: InstanceCategory::Relationship,
                ..
            }
        ));
    }

    #[test]
    fn unknown_tag_is_invalid_bean_class() {
        let err = Converter::standard()
            .convert_entity("widget", Some(&term()), &ctx())
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBeanClass { .. }));
    }

    #[test]
    fn shape_mismatch_is_invalid_bean_class() {
        let converter = Converter::standard();
        let err = converter
            .convert_entity("related-element", Some(&term()), &ctx())
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBeanClass { .. }));

        let rel = relationship("r", "AttachedLike", todo_end(), todo_end());
        let err = converter
            .convert_relationship("asset", Some(&term()), Some(&rel), &ctx())
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBeanClass { .. }));
    }

    #[test]
    fn strict_types_rejects_other_entity_types() {
        let converter = Converter::standard().with_strict_types(true);
        let err = converter
            .convert_entity("asset", Some(&term()), &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnexpectedElementType { ref expected, ref actual, .. }
                if expected == "Asset" && actual == "GlossaryTerm"
        ));
        // Super types count.
        assert!(converter.convert_entity("referenceable", Some(&term()), &ctx()).is_ok());
        // Lenient by default.
        assert!(Converter::standard().convert_entity("asset", Some(&term()), &ctx()).is_ok());
    }

    #[test]
    fn action_routes_relationships_in_order() {
        let target = |guid: &str, name: &str, status: ActivityStatus| {
            relationship(guid, "ActionTarget", todo_end(), proxy(&format!("{guid}-el"), "Asset", name))
                .with_properties(
                    InstanceProperties::new()
                        .with("actionTargetName", name)
                        .with(
                            "activityStatus",
                            PropertyValue::enumeration(
                                crate::bag::PropertyEnum::ordinal(&status),
                                crate::bag::PropertyEnum::symbolic_name(&status),
                            ),
                        ),
                )
        };
        let relationships = vec![
            target("t-1", "first", ActivityStatus::Requested),
            relationship("s-1", "ActionSource", proxy("src-1", "Incident", "incident::1"), todo_end()),
            relationship("a-1", "ActionAssignment", proxy("actor-1", "ActorProfile", "actor::1"), todo_end()),
            target("t-2", "second", ActivityStatus::InProgress),
            relationship("s-2", "ActionSource", proxy("src-2", "Incident", "incident::2"), todo_end()),
            target("t-3", "third", ActivityStatus::Completed),
        ];

        let bean = Converter::standard()
            .convert_with_relationships("action", Some(&todo()), &relationships, &ctx())
            .unwrap();
        let Bean::Action(action) = bean else {
            panic!("expected an action");
        };

        assert_eq!(action.properties.status, Some(ToDoStatus::InProgress));
        assert_eq!(action.properties.priority, Some(2));

        let names: Vec<_> = action
            .action_targets
            .iter()
            .map(|t| t.properties.action_target_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(action.action_targets[1].properties.status, Some(ActivityStatus::InProgress));
        assert_eq!(action.action_targets[2].target_element.header.guid, "t-3-el");

        let source = action.source.unwrap();
        assert_eq!(source.relationship_header.guid, "s-1");
        assert_eq!(source.related_element.header.guid, "src-1");
        assert_eq!(source.related_element.unique_name.as_deref(), Some("incident::1"));

        assert_eq!(action.assigned_actors.len(), 1);
        assert_eq!(action.assigned_actors[0].related_element.header.guid, "actor-1");
    }

    #[test]
    fn relationship_routes_by_super_type() {
        let rel = Relationship::new(
            "t-1",
            InstanceType::new("UrgentActionTarget").with_super_types(["ActionTarget"]),
            todo_end(),
            proxy("asset-1", "Asset", "asset::1"),
        );
        let bean = Converter::standard()
            .convert_with_relationships("action", Some(&todo()), &[rel], &ctx())
            .unwrap();
        let Bean::Action(action) = bean else {
            panic!("expected an action");
        };
        assert_eq!(action.action_targets.len(), 1);
    }

    #[test]
    fn unmatched_relationship_policies() {
        let stray = relationship("x-1", "SemanticAssignment", todo_end(), proxy("t", "GlossaryTerm", "t"));
        let relationships = [stray];

        for policy in [UnmatchedRelationshipPolicy::Ignore, UnmatchedRelationshipPolicy::Warn] {
            let bean = Converter::standard()
                .with_policy(policy)
                .convert_with_relationships("action", Some(&todo()), &relationships, &ctx())
                .unwrap();
            let Bean::Action(action) = bean else {
                panic!("expected an action");
            };
            assert!(action.action_targets.is_empty());
            assert!(action.source.is_none());
        }

        let err = Converter::standard()
            .with_policy(UnmatchedRelationshipPolicy::Reject)
            .convert_with_relationships("action", Some(&todo()), &relationships, &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnrecognizedRelationshipType { ref relationship_type, ref guid, .. }
                if relationship_type == "SemanticAssignment" && guid == "x-1"
        ));
    }

    #[test]
    fn entity_only_bean_applies_policy_to_relationships() {
        let rel = relationship("r-1", "AttachedLike", term().to_proxy(), todo_end());
        let converter = Converter::standard().with_policy(UnmatchedRelationshipPolicy::Reject);
        assert!(
            converter
                .convert_with_relationship("asset", Some(&term()), Some(&rel), &ctx())
                .is_err()
        );
        assert!(
            Converter::standard()
                .convert_with_relationship("asset", Some(&term()), Some(&rel), &ctx())
                .is_ok()
        );
    }

    #[test]
    fn collection_member_reads_membership() {
        let member = entity("asset-1", "Asset", &["Referenceable"])
            .with_properties(InstanceProperties::new().with(QUALIFIED_NAME, "asset::1"));
        let membership = relationship(
            "m-1",
            "CollectionMembership",
            proxy("coll-1", "Collection", "collection::favourites"),
            member.to_proxy(),
        )
        .with_properties(
            InstanceProperties::new()
                .with("membershipRationale", "used daily")
                .with("confidence", 80i32)
                .with("status", PropertyValue::enumeration(4, "VALIDATED")),
        );

        let bean = Converter::standard()
            .convert_with_relationship("collection-member", Some(&member), Some(&membership), &ctx())
            .unwrap();
        let Bean::CollectionMember(element) = bean else {
            panic!("expected a collection member");
        };
        let membership = element.membership.unwrap();
        assert_eq!(membership.collection.header.guid, "coll-1");
        assert_eq!(membership.collection.unique_name.as_deref(), Some("collection::favourites"));
        assert_eq!(membership.properties.confidence, Some(80));
        assert_eq!(membership.properties.status, Some(MembershipStatus::Validated));
        assert!(membership.properties.extended_properties.is_empty());
    }

    #[test]
    fn like_without_attachment() {
        let like = entity("like-1", "Like", &["Referenceable"])
            .with_properties(InstanceProperties::new().with("emoji", 1i32));
        let bean = Converter::standard()
            .convert_with_relationship("like", Some(&like), None, &ctx())
            .unwrap();
        let Bean::Like(element) = bean else {
            panic!("expected a like");
        };
        assert_eq!(element.properties.emoji, Some(1));
        assert!(element.attachment.is_none());
    }

    #[test]
    fn like_reads_attachment_visibility() {
        let like = entity("like-1", "Like", &["Referenceable"]);
        let attached = relationship(
            "al-1",
            "AttachedLike",
            proxy("asset-1", "Asset", "asset::1"),
            like.to_proxy(),
        )
        .with_properties(InstanceProperties::new().with("isPublic", true));
        let bean = Converter::standard()
            .convert_with_relationship("like", Some(&like), Some(&attached), &ctx())
            .unwrap();
        let Bean::Like(element) = bean else {
            panic!("expected a like");
        };
        let attachment = element.attachment.unwrap();
        assert_eq!(attachment.properties.is_public, Some(true));
        assert_eq!(attachment.attached_to.header.guid, "asset-1");
    }

    #[test]
    fn related_element_reads_from_starting_entity() {
        let rel = relationship(
            "r-1",
            "ActionAssignment",
            todo_end(),
            proxy("actor-1", "ActorProfile", "actor::1"),
        )
        .with_properties(InstanceProperties::new().with("note", "x"));
        let converter = Converter::standard();

        let from_todo = converter
            .convert_relationship("related-element", Some(&todo()), Some(&rel), &ctx())
            .unwrap();
        let Bean::RelatedElement(from_todo) = from_todo else {
            panic!("expected a related element");
        };
        assert_eq!(from_todo.related_element.header.guid, "actor-1");
        assert_eq!(
            from_todo.relationship_properties.extended_properties.get("note"),
            Some(&PropertyValue::from("x"))
        );

        let actor = entity("actor-1", "ActorProfile", &[]);
        let Bean::RelatedElement(from_actor) = converter
            .convert_relationship("related-element", Some(&actor), Some(&rel), &ctx())
            .unwrap()
        else {
            panic!("expected a related element");
        };
        assert_eq!(from_actor.related_element.header.guid, "todo-1");

        let Bean::RelatedElement(no_start) = converter
            .convert_relationship("related-element", None, Some(&rel), &ctx())
            .unwrap()
        else {
            panic!("expected a related element");
        };
        assert_eq!(no_start.related_element.header.guid, "actor-1");
    }

    #[test]
    fn relationship_not_touching_entity_is_detached() {
        let stray = relationship(
            "t-9",
            "ActionTarget",
            proxy("other-todo", "ToDo", "todo::other"),
            proxy("asset-9", "Asset", "asset::9"),
        );
        for policy in [UnmatchedRelationshipPolicy::Ignore, UnmatchedRelationshipPolicy::Reject] {
            let err = Converter::standard()
                .with_policy(policy)
                .convert_with_relationships("action", Some(&todo()), slice::from_ref(&stray), &ctx())
                .unwrap_err();
            assert!(matches!(
                err,
                ConvertError::DetachedRelationship { ref guid, ref entity_guid, .. }
                    if guid == "t-9" && entity_guid == "todo-1"
            ));
            assert_eq!(err.bean_class(), "ActionElement");
        }

        let err = Converter::standard()
            .convert_relationship("related-element", Some(&term()), Some(&stray), &ctx())
            .unwrap_err();
        assert!(matches!(err, ConvertError::DetachedRelationship { .. }));
    }

    #[test]
    fn action_relationship_at_wrong_end_is_unmatched() {
        // The to-do sits at end two of an ActionTarget, where targets never are.
        let reversed = relationship(
            "t-1",
            "ActionTarget",
            proxy("asset-1", "Asset", "asset::1"),
            todo_end(),
        );
        let Bean::Action(action) = Converter::standard()
            .convert_with_relationships("action", Some(&todo()), slice::from_ref(&reversed), &ctx())
            .unwrap()
        else {
            panic!("expected an action");
        };
        assert!(action.action_targets.is_empty());

        let err = Converter::standard()
            .with_policy(UnmatchedRelationshipPolicy::Reject)
            .convert_with_relationships("action", Some(&todo()), slice::from_ref(&reversed), &ctx())
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedRelationshipType { .. }));
    }

    #[test]
    fn collection_at_end_one_is_not_a_membership() {
        let collection = entity("coll-1", "Collection", &["Referenceable"]);
        let membership = relationship(
            "m-1",
            "CollectionMembership",
            collection.to_proxy(),
            proxy("asset-1", "Asset", "asset::1"),
        );

        let Bean::CollectionMember(element) = Converter::standard()
            .convert_with_relationship("collection-member", Some(&collection), Some(&membership), &ctx())
            .unwrap()
        else {
            panic!("expected a collection member");
        };
        assert!(element.membership.is_none());
        assert_eq!(element.header.guid, "coll-1");

        let err = Converter::standard()
            .with_policy(UnmatchedRelationshipPolicy::Reject)
            .convert_with_relationship("collection-member", Some(&collection), Some(&membership), &ctx())
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnrecognizedRelationshipType { ref relationship_type, .. }
                if relationship_type == "CollectionMembership"
        ));
    }

    #[test]
    fn like_at_end_one_is_not_attached() {
        let like = entity("like-1", "Like", &["Referenceable"]);
        let reversed = relationship(
            "al-1",
            "AttachedLike",
            like.to_proxy(),
            proxy("asset-1", "Asset", "asset::1"),
        );
        let Bean::Like(element) = Converter::standard()
            .convert_with_relationship("like", Some(&like), Some(&reversed), &ctx())
            .unwrap()
        else {
            panic!("expected a like");
        };
        assert!(element.attachment.is_none());
    }

    #[test]
    fn action_target_reads_activity_dates() {
        let started = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        let completed = Utc.with_ymd_and_hms(2026, 10, 3, 17, 30, 0).unwrap();
        let target = relationship(
            "t-1",
            "ActionTarget",
            todo_end(),
            proxy("asset-1", "Asset", "asset::1"),
        )
        .with_properties(
            InstanceProperties::new()
                .with("startDate", started)
                .with("completionDate", completed)
                .with("completionMessage", "done"),
        );
        let Bean::Action(action) = Converter::standard()
            .convert_with_relationships("action", Some(&todo()), slice::from_ref(&target), &ctx())
            .unwrap()
        else {
            panic!("expected an action");
        };
        let properties = &action.action_targets[0].properties;
        assert_eq!(properties.start_date, Some(started));
        assert_eq!(properties.completion_date, Some(completed));
        assert_eq!(properties.completion_message.as_deref(), Some("done"));
        assert!(properties.extended_properties.is_empty());
    }

    #[test]
    fn conversion_with_nan_is_deterministic() {
        let source = entity("asset-1", "Asset", &[]).with_properties(
            InstanceProperties::new()
                .with("name", "n")
                .with("score", PropertyValue::Float(f64::NAN)),
        );
        let converter = Converter::standard();
        let first = converter.convert_entity("asset", Some(&source), &ctx()).unwrap();
        let second = converter.convert_entity("asset", Some(&source), &ctx()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_instance_properties(), source.properties);
    }

    #[test]
    fn bean_serializes_with_kind_tag() {
        let bean = Converter::standard()
            .convert_entity("glossary-term", Some(&term()), &ctx())
            .unwrap();
        let json = serde_json::to_value(&bean).unwrap();
        assert_eq!(json["beanKind"], "glossary-term");
        assert_eq!(json["properties"]["displayName"], "y");
        let back: Bean = serde_json::from_value(json).unwrap();
        assert_eq!(back, bean);
    }
}
