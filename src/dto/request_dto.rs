use serde::Deserialize;

// Nueva solicitud de despacho; sin `departAt` sale "ahora"
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestRequest {
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub depart_at: Option<String>,
    pub notes: Option<String>,
}
