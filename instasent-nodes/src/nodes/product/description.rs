use crate::fields::{
    FieldDefault, FieldKind, FieldSpec, NodeDescription, OperationSpec, ResourceSpec, Show,
};

pub static DESCRIPTION: NodeDescription = NodeDescription {
    name: "instasent-product",
    display_name: "Instasent",
    description: "Work with Instasent audiences, segments, campaigns, automations and SMS",
    credential: "instasentProductApi",
    resources: RESOURCES,
    fields: FIELDS,
};

const fn op(value: &'static str, name: &'static str, description: &'static str) -> OperationSpec {
    OperationSpec {
        value,
        name,
        description,
    }
}

static RESOURCES: &[ResourceSpec] = &[
    ResourceSpec {
        value: "organization",
        name: "Organization",
        operations: &[op("get", "Get", "Get the organization and its projects")],
    },
    ResourceSpec {
        value: "project",
        name: "Project",
        operations: &[
            op("get", "Get", "Get the configured project"),
            op("getAttributes", "Get Attributes", "List contact attribute specs"),
            op("getEventTypes", "Get Event Types", "List event type specs"),
            op("getEventParameters", "Get Event Parameters", "List parameters of one event type"),
        ],
    },
    ResourceSpec {
        value: "audience",
        name: "Audience",
        operations: &[
            op("delete-contact", "Delete Contact", "Delete a contact through the audience stream"),
            op("email-subscribe", "Email Subscribe", "Subscribe a contact to email"),
            op("email-unsubscribe", "Email Unsubscribe", "Unsubscribe a contact from email"),
            op("getById", "Get by Audience ID", "Get a contact by audience ID"),
            op("get", "Get by Unique Attribute", "Get a contact by user ID or unique value"),
            op("getEvents", "Get Contact Events", "List the events of a contact"),
            op("scroll", "Scroll", "Page through contacts with a cursor (max 100 per page)"),
            op("scrollBySegment", "Scroll by Segment", "Page through the contacts of a segment"),
            op("scrollEvents", "Scroll Events", "Page through events with a cursor (max 100 per page)"),
            op("search", "Search", "Search contacts (max 50 results)"),
            op("searchByEmail", "Search by Email", "Find contacts by email address"),
            op("searchByPhone", "Search by Phone", "Find contacts by phone number"),
            op("searchEvents", "Search Events", "Search events (max 50 results)"),
            op("sms-subscribe", "SMS Subscribe", "Subscribe a contact to SMS"),
            op("sms-unsubscribe", "SMS Unsubscribe", "Unsubscribe a contact from SMS"),
        ],
    },
    ResourceSpec {
        value: "datasourceStream",
        name: "Data Source Stream",
        operations: &[
            op("deleteContact", "Delete Contact", "Delete a contact from the stream"),
            op("getContact", "Get Contact", "Get a contact from the stream"),
            op("getStats", "Get Stats", "Get data source statistics"),
            op("getStream", "Get Stream", "Get the data source stream"),
            op("getStreamSpecs", "Get Stream Specs", "Get attribute, event or event parameter specs"),
            op("pushContacts", "Push Contacts", "Create or update a contact"),
            op("pushEvents", "Push Events", "Push an event for a contact"),
        ],
    },
    ResourceSpec {
        value: "segment",
        name: "Segment",
        operations: &[
            op("list", "List", "List segments"),
            op("listDynamic", "List Dynamic", "List dynamic segments"),
            op("get", "Get", "Get a segment"),
        ],
    },
    ResourceSpec {
        value: "campaign",
        name: "Campaign",
        operations: &[
            op("list", "List", "List campaigns"),
            op("get", "Get", "Get a campaign"),
        ],
    },
    ResourceSpec {
        value: "automation",
        name: "Automation",
        operations: &[
            op("list", "List", "List automations"),
            op("get", "Get", "Get an automation"),
        ],
    },
    ResourceSpec {
        value: "smsSender",
        name: "SMS Sender",
        operations: &[op("list", "List", "List SMS senders")],
    },
    ResourceSpec {
        value: "sms",
        name: "SMS",
        operations: &[
            op("get", "Get", "Get an SMS"),
            op("listByAudience", "List by Audience", "List SMS sent to a contact"),
            op("listByAutomation", "List by Automation", "List SMS sent by an automation message"),
            op("listByCampaign", "List by Campaign", "List SMS sent by a campaign option"),
            op("listBySend", "List by Send", "List SMS of one send"),
            op("listDirect", "List Direct", "List direct SMS"),
            op("createDirect", "Send Direct SMS", "Send an SMS directly to a contact"),
        ],
    },
];

const PROJECT: &[&str] = &["project"];
const AUDIENCE: &[&str] = &["audience"];
const STREAM: &[&str] = &["datasourceStream"];
const SEGMENT: &[&str] = &["segment"];
const CAMPAIGN_AUTOMATION: &[&str] = &["campaign", "automation"];
const CAMPAIGN: &[&str] = &["campaign"];
const AUTOMATION: &[&str] = &["automation"];
const SMS: &[&str] = &["sms"];
const LISTABLE: &[&str] = &["segment", "campaign", "automation", "smsSender"];

const AUDIENCE_QUERIES: &[&str] = &["search", "scroll", "scrollBySegment"];
const EVENT_QUERIES: &[&str] = &["searchEvents", "scrollEvents"];
const STREAM_OPS: &[&str] = &[
    "sms-subscribe",
    "sms-unsubscribe",
    "email-subscribe",
    "email-unsubscribe",
    "delete-contact",
];
const UNSUBSCRIBE: &[&str] = &["sms-unsubscribe", "email-unsubscribe"];
const SMS_LISTS: &[&str] = &[
    "listByAudience",
    "listBySend",
    "listByCampaign",
    "listByAutomation",
    "listDirect",
];

const QUERY_FILTER_HINT: &str =
    "QueryFilter as JSON. Pagination from the Limit and Cursor fields overrides values in the filter";

static FIELDS: &[FieldSpec] = &[
    // project
    FieldSpec::new("eventType", "Event Type", FieldKind::Options, Show::on(PROJECT, &["getEventParameters"]))
        .required()
        .options_from("getEventTypes"),
    // audience
    FieldSpec::new("userId", "User ID / Unique Value", FieldKind::String, Show::on(AUDIENCE, &["get"]))
        .required(),
    FieldSpec::new("audienceId", "Audience ID", FieldKind::String, Show::on(AUDIENCE, &["getById", "getEvents"]))
        .required(),
    FieldSpec::new("userPhone", "Phone Number", FieldKind::String, Show::on(AUDIENCE, &["searchByPhone"]))
        .required(),
    FieldSpec::new("userEmail", "Email Address", FieldKind::String, Show::on(AUDIENCE, &["searchByEmail"]))
        .required(),
    FieldSpec::new("queryFilterJson", "Audience Query Filter (JSON)", FieldKind::Json, Show::on(AUDIENCE, AUDIENCE_QUERIES))
        .described(QUERY_FILTER_HINT)
        .default_to(FieldDefault::Text("{}")),
    FieldSpec::new("queryFilterJson", "Event Query Filter (JSON)", FieldKind::Json, Show::on(AUDIENCE, EVENT_QUERIES))
        .described(QUERY_FILTER_HINT)
        .default_to(FieldDefault::Text("{}")),
    FieldSpec::new(
        "limit",
        "Limit",
        FieldKind::Number,
        Show::on(AUDIENCE, &["search", "scroll", "scrollBySegment", "searchEvents", "scrollEvents"]),
    )
    .described("Max results; capped at 50 for search and 100 for scroll")
    .default_to(FieldDefault::Number(50)),
    FieldSpec::new("cursor", "Cursor", FieldKind::String, Show::on(AUDIENCE, &["scroll", "scrollBySegment", "scrollEvents"]))
        .described("Cursor from the previous page; empty for the first page"),
    FieldSpec::new("segmentUid", "Segment", FieldKind::Options, Show::on(AUDIENCE, &["scrollBySegment"]))
        .required()
        .options_from("getSegments"),
    FieldSpec::new("segmentParameter", "Segment Parameter", FieldKind::String, Show::on(AUDIENCE, &["scrollBySegment"])),
    FieldSpec::new("streamAudienceId", "Audience ID", FieldKind::String, Show::on(AUDIENCE, STREAM_OPS))
        .required(),
    FieldSpec::new("reason", "Reason", FieldKind::String, Show::on(AUDIENCE, UNSUBSCRIBE)),
    FieldSpec::new("utmSource", "UTM Source", FieldKind::String, Show::on(AUDIENCE, UNSUBSCRIBE)),
    FieldSpec::new("utmMedium", "UTM Medium", FieldKind::String, Show::on(AUDIENCE, UNSUBSCRIBE)),
    FieldSpec::new("utmCampaign", "UTM Campaign", FieldKind::String, Show::on(AUDIENCE, UNSUBSCRIBE)),
    FieldSpec::new("sync", "Sync", FieldKind::Boolean, Show::on(AUDIENCE, STREAM_OPS))
        .described("Process immediately instead of queuing")
        .default_to(FieldDefault::Flag(false)),
    // datasourceStream
    FieldSpec::new("datasourceId", "Data Source ID (Optional)", FieldKind::String, Show::on(STREAM, &[]))
        .described("Leave empty to use the default API data source"),
    FieldSpec::new("specType", "Spec Type", FieldKind::Options, Show::on(STREAM, &["getStreamSpecs"]))
        .required()
        .described("attributes, events or event-parameters")
        .default_to(FieldDefault::Text("attributes")),
    FieldSpec::new("specEventType", "Event Type", FieldKind::String, Show::on(STREAM, &["getStreamSpecs"]))
        .described("Only used with event-parameters"),
    FieldSpec::new("userId", "User ID", FieldKind::String, Show::on(STREAM, &["getContact", "deleteContact"]))
        .required(),
    FieldSpec::new("contactUserId", "User ID", FieldKind::String, Show::on(STREAM, &["pushContacts"]))
        .required(),
    FieldSpec::new("contactProperties", "Contact Properties", FieldKind::FixedCollection, Show::on(STREAM, &["pushContacts"]))
        .described("`property` entries of {field, value}")
        .options_from("getStreamAttributes"),
    FieldSpec::new("eventUserId", "User ID", FieldKind::String, Show::on(STREAM, &["pushEvents"]))
        .required(),
    FieldSpec::new("eventId", "Event ID", FieldKind::String, Show::on(STREAM, &["pushEvents"]))
        .required()
        .described("Unique identifier for this event, used for deduplication"),
    FieldSpec::new("eventType", "Event Type", FieldKind::Options, Show::on(STREAM, &["pushEvents"]))
        .required()
        .options_from("getStreamEventTypes"),
    FieldSpec::new("eventDate", "Event Date", FieldKind::DateTime, Show::on(STREAM, &["pushEvents"]))
        .described("When the event occurred (ISO 8601); defaults to now"),
    FieldSpec::new("eventParameters", "Event Parameters", FieldKind::FixedCollection, Show::on(STREAM, &["pushEvents"]))
        .described("`parameters` entries of {name, value}")
        .options_from("getStreamEventParameters"),
    FieldSpec::new("sync", "Sync", FieldKind::Boolean, Show::on(STREAM, &["pushContacts", "pushEvents"]))
        .default_to(FieldDefault::Flag(false)),
    FieldSpec::new("dryRun", "Dry Run", FieldKind::Boolean, Show::on(STREAM, &["pushContacts", "pushEvents"]))
        .described("Validate without storing")
        .default_to(FieldDefault::Flag(false)),
    // segment
    FieldSpec::new("segmentUid", "Segment", FieldKind::Options, Show::on(SEGMENT, &["get"]))
        .required()
        .options_from("getSegments"),
    FieldSpec::new("segmentParameter", "Parameter", FieldKind::String, Show::on(SEGMENT, &["get"])),
    // campaign / automation
    FieldSpec::new("campaignId", "Campaign", FieldKind::Options, Show::on(CAMPAIGN, &["get"]))
        .required()
        .options_from("getCampaigns"),
    FieldSpec::new("automationId", "Automation", FieldKind::Options, Show::on(AUTOMATION, &["get"]))
        .required()
        .options_from("getAutomations"),
    FieldSpec::new("filters", "Filters", FieldKind::Collection, Show::on(CAMPAIGN_AUTOMATION, &["list"]))
        .described("Optional `status` (exact match) and `sort` (e.g. name:asc)"),
    // shared list fields
    FieldSpec::new("returnAll", "Return All", FieldKind::Boolean, Show::on(LISTABLE, &["list"]))
        .default_to(FieldDefault::Flag(false)),
    FieldSpec::new("limit", "Limit", FieldKind::Number, Show::on(LISTABLE, &["list"]))
        .default_to(FieldDefault::Number(50)),
    FieldSpec::new("queryFilterJson", "QueryFilter (JSON)", FieldKind::Json, Show::on(LISTABLE, &["list"]))
        .described("Advanced QueryFilter, sent as the _q query parameter")
        .default_to(FieldDefault::Text("{}")),
    // sms
    FieldSpec::new("smsId", "SMS ID", FieldKind::String, Show::on(SMS, &["get"])).required(),
    FieldSpec::new("audienceId", "Audience ID or Phone", FieldKind::String, Show::on(SMS, &["listByAudience", "createDirect"]))
        .required(),
    FieldSpec::new("sendId", "Send ID", FieldKind::String, Show::on(SMS, &["listBySend"])).required(),
    FieldSpec::new("campaignId", "Campaign", FieldKind::Options, Show::on(SMS, &["listByCampaign"]))
        .required()
        .options_from("getCampaigns"),
    FieldSpec::new("optionIdx", "Option Index", FieldKind::Number, Show::on(SMS, &["listByCampaign"]))
        .default_to(FieldDefault::Number(0)),
    FieldSpec::new("automationId", "Automation", FieldKind::Options, Show::on(SMS, &["listByAutomation"]))
        .required()
        .options_from("getAutomations"),
    FieldSpec::new("messageIdx", "Message Index", FieldKind::Number, Show::on(SMS, &["listByAutomation"]))
        .default_to(FieldDefault::Number(0)),
    FieldSpec::new("senderId", "Sender", FieldKind::Options, Show::on(SMS, &["createDirect"]))
        .default_to(FieldDefault::Text("default"))
        .options_from("getSmsSenders"),
    FieldSpec::new("text", "Message Text", FieldKind::String, Show::on(SMS, &["createDirect"])).required(),
    FieldSpec::new("allowUnicode", "Allow Unicode", FieldKind::Boolean, Show::on(SMS, &["createDirect"]))
        .default_to(FieldDefault::Flag(false)),
    FieldSpec::new("utmTerm", "Tracking Term (UTM Term - Optional)", FieldKind::String, Show::on(SMS, &["createDirect"])),
    FieldSpec::new("listDirectUtmTerm", "Tracking Term (UTM Term - Optional)", FieldKind::String, Show::on(SMS, &["listDirect"])),
    FieldSpec::new("returnAll", "Return All", FieldKind::Boolean, Show::on(SMS, SMS_LISTS))
        .default_to(FieldDefault::Flag(false)),
    FieldSpec::new("limit", "Limit", FieldKind::Number, Show::on(SMS, SMS_LISTS))
        .default_to(FieldDefault::Number(50)),
    FieldSpec::new("queryFilterJson", "QueryFilter (JSON)", FieldKind::Json, Show::on(SMS, SMS_LISTS))
        .default_to(FieldDefault::Text("{}")),
];
