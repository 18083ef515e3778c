use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::future::Future;
use tracing::debug;

const DTS_OPERATING_CASH_URL: &str = "https://api.fiscaldata.treasury.gov/services/api/fiscal_service/v1/accounting/dts/deposits_withdrawals_operating_cash";
const DTS_FIELDS: &str = "record_date,transaction_today_amt";
const DTS_SORT: &str = "record_date";
pub const PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    pub record_date: String,
    #[serde(default)]
    pub transaction_today_amt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    data: Vec<RawRecord>,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<RawRecord>,
    pub pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageReceived {
    pub page: u32,
    pub total: usize,
}

pub async fn fetch_operating_cash(
    client: &Client,
    year: i32,
    on_page: impl FnMut(PageReceived),
) -> Result<FetchOutcome> {
    collect_pages(
        PAGE_SIZE,
        |page| fetch_page(client, DTS_OPERATING_CASH_URL, year, page),
        on_page,
    )
    .await
    .with_context(|| format!("failed to download operating cash records for {year}"))
}

/// Requests pages starting at 1 until one comes back empty or shorter than `page_size`.
pub async fn collect_pages<F, Fut>(
    page_size: usize,
    mut fetch_page: F,
    mut on_page: impl FnMut(PageReceived),
) -> Result<FetchOutcome>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<RawRecord>>>,
{
    let mut records = Vec::new();
    let mut page = 1;

    loop {
        let chunk = fetch_page(page).await?;
        let received = chunk.len();
        records.extend(chunk);
        on_page(PageReceived {
            page,
            total: records.len(),
        });
        if received < page_size {
            break;
        }
        page += 1;
    }

    Ok(FetchOutcome {
        records,
        pages: page,
    })
}

pub fn query_params(year: i32, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("fields", DTS_FIELDS.to_string()),
        ("filter", format!("record_calendar_year:eq:{year}")),
        ("sort", DTS_SORT.to_string()),
        ("page[size]", PAGE_SIZE.to_string()),
        ("format", "json".to_string()),
        ("page[number]", page.to_string()),
    ]
}

fn page_url(base_url: &str, year: i32, page: u32) -> Result<Url> {
    Url::parse_with_params(base_url, query_params(year, page))
        .with_context(|| format!("failed to build request URL for page {page}"))
}

async fn fetch_page(
    client: &Client,
    base_url: &str,
    year: i32,
    page: u32,
) -> Result<Vec<RawRecord>> {
    let url = page_url(base_url, year, page)?;
    let body: PageBody = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to request page {page}"))?
        .error_for_status()
        .with_context(|| format!("server rejected page {page}"))?
        .json()
        .await
        .with_context(|| format!("failed to decode page {page}"))?;

    debug!(page, records = body.data.len(), "fetched operating cash page");
    Ok(body.data)
}
