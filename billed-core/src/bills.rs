use chrono::{DateTime, Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{
    error::{BilledError, Result},
    models::BillRecord,
    routes::{Navigator, Route},
    store::Store,
};

pub const BILL_URL_ATTRIBUTE: &str = "data-bill-url";

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Clickable receipt icon of a bill row.
pub trait BillIcon {
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Surface that displays a receipt (the modal on the bills page).
pub trait ReceiptViewer: Send + Sync {
    fn show_receipt(&self, file_url: &str);
}

/// A bill ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct BillView {
    pub record: BillRecord,
    /// Formatted date, or the raw value when it could not be parsed.
    pub display_date: String,
    pub display_status: &'static str,
}

impl BillView {
    pub fn from_record(record: BillRecord) -> Self {
        let display_date = match format_date(&record.date) {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!("{} for bill {:?}", e, record.id);
                record.date.clone()
            }
        };
        let display_status = record.status.label();

        Self {
            record,
            display_date,
            display_status,
        }
    }

    pub fn file_url(&self) -> Option<&str> {
        self.record.file_url.as_deref()
    }
}

/// Bills in display order. Formatting happens as the rows are pulled.
#[derive(Debug)]
pub struct BillRows {
    inner: std::vec::IntoIter<BillRecord>,
}

impl Iterator for BillRows {
    type Item = BillView;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(BillView::from_record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for BillRows {}

/// What the bills page shows after a load.
#[derive(Debug, Clone, PartialEq)]
pub enum BillsPage {
    Loaded(Vec<BillView>),
    Error(String),
}

impl BillsPage {
    pub fn rows(&self) -> &[BillView] {
        match self {
            BillsPage::Loaded(rows) => rows.as_slice(),
            BillsPage::Error(_) => &[],
        }
    }
}

pub struct BillListService {
    store: Arc<dyn Store>,
    navigator: Arc<dyn Navigator>,
    viewer: Arc<dyn ReceiptViewer>,
}

impl BillListService {
    pub fn new(
        store: Arc<dyn Store>,
        navigator: Arc<dyn Navigator>,
        viewer: Arc<dyn ReceiptViewer>,
    ) -> Self {
        Self {
            store,
            navigator,
            viewer,
        }
    }

    /// Fetches every bill, most recent first.
    pub async fn get_bills(&self) -> Result<BillRows> {
        let mut bills = self.store.bills().list().await?;
        debug!("fetched {} bills", bills.len());
        sort_by_date_desc(&mut bills);
        Ok(BillRows {
            inner: bills.into_iter(),
        })
    }

    /// Loads the page state, turning a fetch failure into its message.
    pub async fn load(&self) -> BillsPage {
        match self.get_bills().await {
            Ok(rows) => BillsPage::Loaded(rows.collect()),
            Err(e) => {
                error!("failed to fetch bills: {}", e);
                BillsPage::Error(e.to_string())
            }
        }
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.on_navigate(Route::NewBill.path());
    }

    /// Shows the receipt referenced by the icon. Returns the URL shown.
    pub fn handle_click_icon_eye(&self, icon: &dyn BillIcon) -> Option<String> {
        let Some(url) = icon.attribute(BILL_URL_ATTRIBUTE) else {
            warn!("receipt icon has no {}", BILL_URL_ATTRIBUTE);
            return None;
        };
        info!("showing receipt {}", url);
        self.viewer.show_receipt(&url);
        Some(url)
    }
}

/// Stable sort, newest first. Bills whose date does not parse keep their
/// fetch order after all dated bills.
pub fn sort_by_date_desc(bills: &mut [BillRecord]) {
    bills.sort_by_key(|bill| std::cmp::Reverse(parse_date(&bill.date)));
}

/// `"2004-04-04"` becomes `"4 Avr. 04"`.
pub fn format_date(raw: &str) -> Result<String> {
    let date = parse_date(raw).ok_or_else(|| BilledError::InvalidDate(raw.to_string()))?;
    let month = MONTHS[date.month0() as usize];
    Ok(format!("{} {}. {:02}", date.day(), month, date.year().rem_euclid(100)))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
