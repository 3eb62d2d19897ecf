//! Action (to-do) beans.
//!
//! An action is built from a `ToDo` entity plus the relationships that say
//! where the request came from, who it is assigned to, and which elements
//! it acts on.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use openmeta_core::instance::Relationship;
use openmeta_core::property::{InstanceProperties, PropertyValue};

use crate::bag::{PropertyBag, PropertyWriter};
use crate::beans::enums::{ActivityStatus, ToDoStatus};
use crate::beans::header::ElementHeader;
use crate::beans::referenceable::ReferenceableProperties;
use crate::beans::related::{ElementStub, RelatedElement};
use crate::beans::{Bean, BeanKind, ToInstanceProperties};
use crate::converter::ConversionRequest;
use crate::error::Result;
use crate::registry::{BeanDescriptor, EntityEnd, InputShape, RelationshipSlot};

const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const CREATION_TIME: &str = "creationTime";
const PRIORITY: &str = "priority";
const DUE_TIME: &str = "dueTime";
const LAST_REVIEW_TIME: &str = "lastReviewTime";
const LAST_PAUSE_TIME: &str = "lastPauseTime";
const LAST_RESUME_TIME: &str = "lastResumeTime";
const COMPLETION_TIME: &str = "completionTime";
const TO_DO_STATUS: &str = "toDoStatus";

const ACTION_TARGET_NAME: &str = "actionTargetName";
const ACTIVITY_STATUS: &str = "activityStatus";
const START_DATE: &str = "startDate";
const COMPLETION_DATE: &str = "completionDate";
const COMPLETION_MESSAGE: &str = "completionMessage";

pub const ACTION_SOURCE: &str = "ActionSource";
pub const ACTION_ASSIGNMENT: &str = "ActionAssignment";
pub const ACTION_TARGET: &str = "ActionTarget";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Source,
    AssignedActor,
    ActionTarget,
}

// Sources and assigned actors sit at end one with the to-do at end two.
// An action target puts the to-do at end one and the target at end two.
const SOURCE_SLOT: RelationshipSlot = RelationshipSlot::new(ACTION_SOURCE, EntityEnd::Two);
const ASSIGNMENT_SLOT: RelationshipSlot = RelationshipSlot::new(ACTION_ASSIGNMENT, EntityEnd::Two);
const TARGET_SLOT: RelationshipSlot = RelationshipSlot::new(ACTION_TARGET, EntityEnd::One);

const ROUTES: &[(RelationshipSlot, Slot)] = &[
    (SOURCE_SLOT, Slot::Source),
    (ASSIGNMENT_SLOT, Slot::AssignedActor),
    (TARGET_SLOT, Slot::ActionTarget),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToDoProperties {
    #[serde(flatten)]
    pub base: ReferenceableProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_pause_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_resume_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ToDoStatus>,
}

impl ToInstanceProperties for ToDoProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        let mut writer = PropertyWriter::new();
        self.base.write_to(&mut writer);
        writer
            .string(NAME, &self.name)
            .string(DESCRIPTION, &self.description)
            .date(CREATION_TIME, self.creation_time)
            .int(PRIORITY, self.priority)
            .date(DUE_TIME, self.due_time)
            .date(LAST_REVIEW_TIME, self.last_review_time)
            .date(LAST_PAUSE_TIME, self.last_pause_time)
            .date(LAST_RESUME_TIME, self.last_resume_time)
            .date(COMPLETION_TIME, self.completion_time)
            .enumeration(TO_DO_STATUS, self.status)
            .extended(&self.base.extended_properties)
            .finish()
    }
}

/// Properties of an `ActionTarget` relationship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTargetProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_target_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_from: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extended_properties: BTreeMap<String, PropertyValue>,
}

impl ActionTargetProperties {
    fn from_relationship(relationship: &Relationship) -> Self {
        let mut bag = PropertyBag::from_properties(&relationship.properties);
        let (effective_from, effective_to) = bag.take_effectivity();
        let mut properties = Self {
            action_target_name: bag.take_string(ACTION_TARGET_NAME),
            status: bag.take_enum(ACTIVITY_STATUS),
            start_date: bag.take_date(START_DATE),
            completion_date: bag.take_date(COMPLETION_DATE),
            completion_message: bag.take_string(COMPLETION_MESSAGE),
            effective_from,
            effective_to,
            extended_properties: BTreeMap::new(),
        };
        properties.extended_properties = bag.into_extended();
        properties
    }
}

impl ToInstanceProperties for ActionTargetProperties {
    fn to_instance_properties(&self) -> InstanceProperties {
        PropertyWriter::new()
            .string(ACTION_TARGET_NAME, &self.action_target_name)
            .enumeration(ACTIVITY_STATUS, self.status)
            .date(START_DATE, self.start_date)
            .date(COMPLETION_DATE, self.completion_date)
            .string(COMPLETION_MESSAGE, &self.completion_message)
            .effectivity(self.effective_from, self.effective_to)
            .extended(&self.extended_properties)
            .finish()
    }
}

/// An element the action works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTargetElement {
    pub relationship_header: ElementHeader,
    pub properties: ActionTargetProperties,
    pub target_element: ElementStub,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionElement {
    pub header: ElementHeader,
    pub properties: ToDoProperties,

    /// The element that requested the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RelatedElement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_actors: Vec<RelatedElement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_targets: Vec<ActionTargetElement>,
}

pub(crate) fn descriptor() -> BeanDescriptor {
    BeanDescriptor {
        kind: BeanKind::Action,
        bean_class: "ActionElement",
        entity_type: Some("ToDo"),
        input: InputShape::EntityWithRelationships,
        relationship_slots: &[SOURCE_SLOT, ASSIGNMENT_SLOT, TARGET_SLOT],
        build,
    }
}

fn build(request: &ConversionRequest<'_>) -> Result<Bean> {
    let entity = request.require_entity()?;
    let guid = entity.guid();

    let mut bag = PropertyBag::from_properties(&entity.properties);
    let base = ReferenceableProperties::take_from(&mut bag);
    let mut properties = ToDoProperties {
        base,
        name: bag.take_string(NAME),
        description: bag.take_string(DESCRIPTION),
        creation_time: bag.take_date(CREATION_TIME),
        priority: bag.take_int(PRIORITY),
        due_time: bag.take_date(DUE_TIME),
        last_review_time: bag.take_date(LAST_REVIEW_TIME),
        last_pause_time: bag.take_date(LAST_PAUSE_TIME),
        last_resume_time: bag.take_date(LAST_RESUME_TIME),
        completion_time: bag.take_date(COMPLETION_TIME),
        status: bag.take_enum(TO_DO_STATUS),
    };
    properties.base.extended_properties = bag.into_extended();

    let mut action = ActionElement {
        header: ElementHeader::from_entity(entity),
        properties,
        source: None,
        assigned_actors: Vec::new(),
        action_targets: Vec::new(),
    };

    for (slot, relationship) in request.route(ROUTES)? {
        match slot {
            Slot::Source if action.source.is_some() => {
                debug!(
                    relationship = relationship.guid(),
                    action = guid,
                    "action already has a source, skipping"
                );
            }
            Slot::Source => {
                action.source = Some(RelatedElement::from_relationship(relationship, guid));
            }
            Slot::AssignedActor => {
                action
                    .assigned_actors
                    .push(RelatedElement::from_relationship(relationship, guid));
            }
            Slot::ActionTarget => action.action_targets.push(ActionTargetElement {
                relationship_header: ElementHeader::from_relationship(relationship),
                properties: ActionTargetProperties::from_relationship(relationship),
                target_element: ElementStub::from_proxy(relationship.other_end(guid)),
            }),
        }
    }

    Ok(Bean::Action(action))
}
