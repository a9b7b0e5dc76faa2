use crate::fields::{
    FieldDefault, FieldKind, FieldSpec, NodeDescription, OperationSpec, ResourceSpec, Show,
};

pub static DESCRIPTION: NodeDescription = NodeDescription {
    name: "instasent-ingest",
    display_name: "Instasent Data Source",
    description: "Ingest contacts and events into an Instasent data source",
    credential: "instasentIngestApi",
    resources: RESOURCES,
    fields: FIELDS,
};

static RESOURCES: &[ResourceSpec] = &[
    ResourceSpec {
        value: "contact",
        name: "Contact",
        operations: &[
            OperationSpec {
                value: "upsert",
                name: "Create or Update",
                description: "Create a new contact, or update the current one if it already exists",
            },
            OperationSpec {
                value: "delete",
                name: "Delete",
                description: "Delete a contact",
            },
        ],
    },
    ResourceSpec {
        value: "event",
        name: "Event",
        operations: &[OperationSpec {
            value: "create",
            name: "Create",
            description: "Create an event for a contact",
        }],
    },
];

const CONTACT: &[&str] = &["contact"];
const EVENT: &[&str] = &["event"];

static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("userId", "User ID", FieldKind::String, Show::on(CONTACT, &[]))
        .required()
        .described("The unique identifier for the contact"),
    FieldSpec::new(
        "contactProperties",
        "Contact Properties",
        FieldKind::FixedCollection,
        Show::on(CONTACT, &["upsert"]),
    )
    .described("Properties to set, as `property` entries of {field, value}")
    .options_from("getContactProperties"),
    FieldSpec::new("instant", "Instant", FieldKind::Boolean, Show::on(CONTACT, &["upsert"]))
        .described("Process the contact immediately instead of queuing it")
        .default_to(FieldDefault::Flag(false)),
    FieldSpec::new("userId", "User ID", FieldKind::String, Show::on(EVENT, &["create"]))
        .required()
        .described("Unique identifier of the user"),
    FieldSpec::new("eventId", "Event ID", FieldKind::String, Show::on(EVENT, &["create"]))
        .required()
        .described("Unique identifier for this event, used for deduplication"),
    FieldSpec::new("eventType", "Event Type", FieldKind::Options, Show::on(EVENT, &["create"]))
        .required()
        .options_from("getEventTypes"),
    FieldSpec::new("eventDate", "Event Date", FieldKind::DateTime, Show::on(EVENT, &["create"]))
        .described("When the event occurred (ISO 8601); defaults to now"),
    FieldSpec::new(
        "eventParameters",
        "Event Parameters",
        FieldKind::FixedCollection,
        Show::on(EVENT, &["create"]),
    )
    .described("Parameters for the selected event type, as `parameters` entries of {name, value}")
    .options_from("getEventParameters"),
];
