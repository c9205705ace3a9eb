//! Kolada KPI and municipality service.

use std::sync::Arc;

use serde_json::Value;

use super::decode_listing;
use crate::client::{encode_path, ClientInner, Paginator, RequestSpec};
use crate::models::{ApiFamily, ApiResult, ErrorInfo, Kpi, Listing, Municipality, MunicipalityType};
use crate::Result;

/// Service for the public Kolada API.
///
/// Kolada needs no credentials; pages are linked by absolute `next_page`
/// URLs and followed until the chain ends.
///
/// # Example
///
/// ```no_run
/// use riksbank_rs::models::MunicipalityType;
///
/// # async fn example(client: riksbank_rs::RiksbankClient) -> Result<(), riksbank_rs::ErrorInfo> {
/// let kpis = client.kolada().kpis(Some("invånare")).await?;
/// let regions = client.kolada().municipalities(Some(MunicipalityType::Region)).await?;
/// let data = client.kolada().kpi_data("N00945", "0180", &[2022, 2023]).await?;
/// # let _ = (kpis, regions, data);
/// # Ok(())
/// # }
/// ```
pub struct KoladaService {
    inner: Arc<ClientInner>,
}

impl KoladaService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    async fn fetch_all(&self, spec: RequestSpec) -> ApiResult<Listing> {
        Paginator::new(self.inner.clone(), ApiFamily::Kolada)
            .fetch_all(&spec)
            .await
    }

    /// List KPIs, optionally searching by title.
    pub async fn kpis(&self, title: Option<&str>) -> ApiResult<Listing<Kpi>> {
        let spec = RequestSpec::get("/kpi").with_query_opt("title", title.filter(|t| !t.is_empty()));
        let raw = self.fetch_all(spec).await?;
        decode_listing(raw, "/kpi")
    }

    /// Look up one KPI by id.
    pub async fn kpi(&self, id: &str) -> ApiResult<Option<Kpi>> {
        let endpoint = encode_path(["kpi", id]).map_err(|e| ErrorInfo::from_error(e, "/kpi"))?;
        let raw = self.fetch_all(RequestSpec::get(endpoint.as_str())).await?;
        let kpis: Listing<Kpi> = decode_listing(raw, &endpoint)?;
        Ok(kpis.items.into_iter().next())
    }

    /// List municipalities and regions, optionally of one kind.
    pub async fn municipalities(
        &self,
        kind: Option<MunicipalityType>,
    ) -> ApiResult<Listing<Municipality>> {
        let raw = self.fetch_all(RequestSpec::get("/municipality")).await?;
        let all: Listing<Municipality> = decode_listing(raw, "/municipality")?;
        Ok(match kind {
            Some(kind) => all.filter(|m| m.is(kind)),
            None => all,
        })
    }

    /// Values of one KPI for one municipality, optionally for given years.
    pub async fn kpi_data(
        &self,
        kpi_id: &str,
        municipality_id: &str,
        years: &[i32],
    ) -> ApiResult<Listing<Value>> {
        let endpoint = kpi_data_path(kpi_id, municipality_id, years)
            .map_err(|e| ErrorInfo::from_error(e, "/data/kpi"))?;
        self.fetch_all(RequestSpec::get(endpoint)).await
    }
}

fn kpi_data_path(kpi_id: &str, municipality_id: &str, years: &[i32]) -> Result<String> {
    let years = years.iter().map(i32::to_string).collect::<Vec<_>>().join(",");
    let mut segments = vec!["data", "kpi", kpi_id, "municipality", municipality_id];
    if !years.is_empty() {
        segments.extend(["year", years.as_str()]);
    }
    encode_path(segments)
}
