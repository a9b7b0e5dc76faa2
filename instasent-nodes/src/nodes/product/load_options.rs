use super::datasource_stream::datasource_scope;
use super::ProductNode;
use crate::error::NodeError;
use crate::options::{
    extract_list, id_string, null_as_default, HttpSpecCatalog, OptionEntry, SpecCatalog,
    SpecEndpoints,
};
use crate::params::Parameters;
use instasent::RequestDescriptor;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Project {
    uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Segment {
    uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Campaign {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default)]
    campaign_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
}

#[derive(Debug, Deserialize)]
struct Automation {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
}

#[derive(Debug, Deserialize)]
struct SmsSender {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
}

impl ProductNode {
    pub(super) async fn options(
        &self,
        method: &str,
        params: &Parameters,
    ) -> Result<Vec<OptionEntry>, NodeError> {
        match method {
            "getProjects" => {
                let response = self.send(RequestDescriptor::get("/")).await?;
                let entity = response.get("entity").cloned().unwrap_or(Value::Null);
                let mut projects: Vec<Project> = extract_list(&entity, "projects")?;
                projects.sort_by(|a, b| {
                    a.name
                        .to_lowercase()
                        .cmp(&b.name.to_lowercase())
                        .then_with(|| a.name.cmp(&b.name))
                });
                Ok(projects
                    .into_iter()
                    .map(|p| OptionEntry::new(p.name, p.uid))
                    .collect())
            }
            "getProjectAttributes" => self.project_catalog().list_attributes().await,
            "getEventTypes" => self.project_catalog().list_event_types().await,
            "getEventParameters" => {
                let event_type = params.string("eventType")?;
                self.project_catalog().list_event_parameters(&event_type).await
            }
            "getSegments" => {
                let segments: Vec<Segment> = self.entities("/segment").await?;
                Ok(segments
                    .into_iter()
                    .map(|s| OptionEntry::new(s.name, s.uid).described(format!("Type: {}", s.kind)))
                    .collect())
            }
            "getDynamicSegments" => {
                let segments: Vec<Segment> = self.entities("/segment/dynamic").await?;
                Ok(segments
                    .into_iter()
                    .map(|s| OptionEntry::new(s.name, s.uid))
                    .collect())
            }
            "getCampaigns" => {
                let campaigns: Vec<Campaign> = self.entities("/campaign").await?;
                Ok(campaigns
                    .into_iter()
                    .map(|c| {
                        let at = c.campaign_at.unwrap_or_default();
                        OptionEntry::new(c.title, c.id)
                            .described(format!("At: {} - Status: {}", at, c.status))
                    })
                    .collect())
            }
            "getAutomations" => {
                let automations: Vec<Automation> = self.entities("/automation").await?;
                Ok(automations
                    .into_iter()
                    .map(|a| OptionEntry::new(a.title, a.id).described(format!("Status: {}", a.status)))
                    .collect())
            }
            "getSmsSenders" => {
                let senders: Vec<SmsSender> = self.entities("/channel/sms/sender").await?;
                let mut options = vec![OptionEntry::new("Default", "default")
                    .described("Use the project's default sender")];
                options.extend(
                    senders.into_iter().map(|s| {
                        OptionEntry::new(s.from, s.id).described(format!("Status: {}", s.status))
                    }),
                );
                Ok(options)
            }
            "getStreamAttributes" => self.stream_catalog(params)?.list_attributes().await,
            "getStreamEventTypes" => self.stream_catalog(params)?.list_event_types().await,
            "getStreamEventParameters" => {
                let event_type = params.string("eventType")?;
                self.stream_catalog(params)?
                    .list_event_parameters(&event_type)
                    .await
            }
            _ => Err(NodeError::UnknownOptionsMethod(method.to_string())),
        }
    }

    /// `entities` of a project-scoped GET.
    async fn entities<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, NodeError> {
        let response = self.send_in_project(RequestDescriptor::get(path)).await?;
        extract_list(&response, "entities")
    }

    fn project_catalog(&self) -> HttpSpecCatalog<'_> {
        HttpSpecCatalog::new(
            &self.executor,
            &self.credentials,
            SpecEndpoints::project(&self.credentials.project_path()),
        )
    }

    fn stream_catalog(&self, params: &Parameters) -> Result<HttpSpecCatalog<'_>, NodeError> {
        let root = format!("{}{}", self.credentials.project_path(), datasource_scope(params)?);
        Ok(HttpSpecCatalog::new(
            &self.executor,
            &self.credentials,
            SpecEndpoints::stream(&root),
        ))
    }
}
