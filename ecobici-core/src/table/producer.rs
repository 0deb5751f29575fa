//! Row producer: bind once, then pull batches.

use super::cursor::BatchCursor;
use super::error::TableError;
use super::gbfs;
use super::schema::{schema_for, ColumnDef};
use super::value::{Row, Value};
use crate::feed::{FeedKind, FetchParams, FetchRequest};
use crate::fetch::{FeedFetcher, ReqwestTransport, Transport};
use tracing::info;

/// Result of a bind: the schema and a cursor over the fully materialized rows.
#[derive(Debug, Clone)]
pub struct BoundTable {
    kind: FeedKind,
    schema: &'static [ColumnDef],
    cursor: BatchCursor,
}

impl BoundTable {
    pub fn new(kind: FeedKind, rows: Vec<Row>) -> Self {
        Self {
            kind,
            schema: schema_for(kind),
            cursor: BatchCursor::new(rows),
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn schema(&self) -> &'static [ColumnDef] {
        self.schema
    }

    pub fn cursor(&self) -> &BatchCursor {
        &self.cursor
    }

    pub fn pull(&mut self, max_batch_size: usize) -> &[Row] {
        self.cursor.pull(max_batch_size)
    }
}

/// Project a real-time GBFS payload into rows for `kind`.
///
/// `HistoricalTrips` payloads are opaque CSV and become a single blob row.
pub fn project_payload(kind: FeedKind, payload: &[u8]) -> Result<Vec<Row>, TableError> {
    let parse_err = |source| TableError::Parse { feed: kind, source };

    let rows = match kind {
        FeedKind::StationStatus => gbfs::parse_station_status(payload)
            .map_err(parse_err)?
            .into_iter()
            .map(gbfs::StationStatus::into_row)
            .collect(),
        FeedKind::StationInformation => gbfs::parse_station_information(payload)
            .map_err(parse_err)?
            .into_iter()
            .map(gbfs::StationInformation::into_row)
            .collect(),
        FeedKind::SystemInformation => gbfs::parse_system_information(payload)
            .map_err(parse_err)?
            .map(gbfs::SystemInformation::into_row)
            .into_iter()
            .collect(),
        FeedKind::HistoricalTrips => vec![Row::new(vec![Value::Blob(payload.to_vec())])],
    };

    Ok(rows)
}

/// Turns fetch requests into bound tables.
pub struct RowProducer<T: Transport = ReqwestTransport> {
    fetcher: FeedFetcher<T>,
}

impl<T: Transport> RowProducer<T> {
    pub fn new(fetcher: FeedFetcher<T>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &FeedFetcher<T> {
        &self.fetcher
    }

    /// Fetch and materialize every row for `request`.
    ///
    /// Real-time kinds make exactly one request and fail on any fetch or
    /// parse error. Historical ranges never fail on fetch errors; months that
    /// could not be fetched are simply absent from the rows.
    pub fn bind(&self, request: &FetchRequest) -> Result<BoundTable, TableError> {
        let kind = request.kind();
        let rows = match request.params() {
            FetchParams::Feed(name) => {
                let payload = self.fetcher.fetch_realtime_feed(name)?;
                project_payload(kind, &payload)?
            }
            FetchParams::Months(range) => {
                let mut rows = Vec::new();
                for csv in self.fetcher.fetch_range(*range) {
                    rows.extend(project_payload(kind, &csv)?);
                }
                rows
            }
        };

        info!(feed = %kind, rows = rows.len(), "bound table");
        Ok(BoundTable::new(kind, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetcherConfig;
    use crate::fetch::{primary_archive_path, HttpResponse, ScriptedTransport};
    use crate::period::{MonthRange, YearMonth};

    fn producer(transport: ScriptedTransport) -> RowProducer<ScriptedTransport> {
        RowProducer::new(FeedFetcher::new(FetcherConfig::default(), transport))
    }

    #[test]
    fn binds_station_information() {
        let p = producer(ScriptedTransport::new().route(
            "/gbfs/en/station_information.json",
            HttpResponse::ok(
                r#"{"data":{"stations":[
                    {"station_id":"1","name":"A","lat":19.4,"lon":-99.1,"address":"x","capacity":10},
                    {"station_id":"2","name":"B"}
                ]}}"#,
            ),
        ));
        let request = FetchRequest::realtime(FeedKind::StationInformation).unwrap();
        let mut table = p.bind(&request).unwrap();

        assert_eq!(table.kind(), FeedKind::StationInformation);
        assert_eq!(table.schema().len(), 6);
        assert_eq!(table.cursor().len(), 2);
        let batch = table.pull(10);
        assert_eq!(batch[1].get(1), Some(&Value::Varchar("B".into())));
        assert_eq!(batch[1].get(5), Some(&Value::Integer(0)));
    }

    #[test]
    fn bind_without_data_container_yields_empty_table() {
        let p = producer(
            ScriptedTransport::new()
                .route("/gbfs/en/station_status.json", HttpResponse::ok(r#"{"ttl":10}"#)),
        );
        let mut table = p
            .bind(&FetchRequest::realtime(FeedKind::StationStatus).unwrap())
            .unwrap();
        assert!(table.cursor().is_empty());
        assert!(table.pull(100).is_empty());
    }

    #[test]
    fn bind_propagates_http_errors() {
        let p = producer(ScriptedTransport::new());
        let err = p
            .bind(&FetchRequest::realtime(FeedKind::SystemInformation).unwrap())
            .unwrap_err();
        assert!(matches!(err, TableError::Fetch(_)));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn bind_reports_malformed_json() {
        let p = producer(
            ScriptedTransport::new()
                .route("/gbfs/en/station_status.json", HttpResponse::ok("<html>")),
        );
        let err = p
            .bind(&FetchRequest::realtime(FeedKind::StationStatus).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::Parse {
                feed: FeedKind::StationStatus,
                ..
            }
        ));
    }

    #[test]
    fn historical_bind_yields_one_blob_row_per_fetched_month() {
        let march = YearMonth::new(2023, 3).unwrap();
        let april = YearMonth::new(2023, 4).unwrap();
        let p = producer(
            ScriptedTransport::new()
                .route(&primary_archive_path(march), HttpResponse::ok("march.csv")),
        );

        let mut table = p
            .bind(&FetchRequest::historical(MonthRange::new(march, april)))
            .unwrap();
        assert_eq!(table.kind(), FeedKind::HistoricalTrips);
        let batch = table.pull(10);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].get(0), Some(&Value::Blob(b"march.csv".to_vec())));
    }

    #[test]
    fn historical_bind_projects_each_month_in_order() {
        let march = YearMonth::new(2023, 3).unwrap();
        let april = YearMonth::new(2023, 4).unwrap();
        let p = producer(
            ScriptedTransport::new()
                .route(&primary_archive_path(march), HttpResponse::ok("m"))
                .route(&primary_archive_path(april), HttpResponse::ok("a")),
        );

        let mut table = p
            .bind(&FetchRequest::historical(MonthRange::new(march, april)))
            .unwrap();
        let expected: Vec<Row> = [b"m", b"a"]
            .iter()
            .flat_map(|csv| project_payload(FeedKind::HistoricalTrips, *csv).unwrap())
            .collect();
        assert_eq!(table.pull(10), expected.as_slice());
    }

    #[test]
    fn project_historical_payload_is_opaque() {
        let rows = project_payload(FeedKind::HistoricalTrips, b"not,json\n").unwrap();
        assert_eq!(rows, vec![Row::new(vec![Value::Blob(b"not,json\n".to_vec())])]);
    }
}
