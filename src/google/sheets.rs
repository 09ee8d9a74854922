//! Google Sheets adapter for the move history and the leaderboard.

use super::{DRIVE_API, GoogleContext, SHEETS_API, api_url, query_literal};
use crate::error::{BoundaryError, BoundaryErrorKind};
use crate::leaderboard::{GameResult, Leaderboard, LeaderboardEntry};
use crate::ports::{HistorySink, LeaderboardStore};
use crate::records::{TrainingRecord, parse_history};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileList {
    #[serde(default)]
    pub(crate) files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DriveFile {
    pub(crate) id: String,
}

/// Spreadsheet column letters for a 0-based index (0 → `A`, 26 → `AA`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_text_rows(values: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    values
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

fn count(cell: Option<&String>) -> u32 {
    cell.and_then(|c| c.trim().parse().ok()).unwrap_or(0)
}

/// Positions of the leaderboard columns, located by header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardColumns {
    width: usize,
    nickname: usize,
    total: usize,
    wins_human: usize,
    wins_ai: usize,
    draws: usize,
}

/// Cell writes needed to record one result.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetUpdate {
    /// Overwrite existing cells: `(A1 cell, new value)`.
    Cells(Vec<(String, u32)>),
    /// Append a new row.
    Append(Vec<Value>),
}

impl LeaderboardColumns {
    /// Finds `human_nickname`, `total_games`, `win_human`, `win_ai` and `draws` in the header row.
    pub fn locate(headers: &[String]) -> Result<Self, BoundaryError> {
        let find = |name: &str| {
            headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
                BoundaryError::new(
                    BoundaryErrorKind::Decode,
                    format!("Leaderboard header '{}' missing", name),
                )
            })
        };
        Ok(Self {
            width: headers.len(),
            nickname: find("human_nickname")?,
            total: find("total_games")?,
            wins_human: find("win_human")?,
            wins_ai: find("win_ai")?,
            draws: find("draws")?,
        })
    }

    /// Builds the leaderboard from all rows (header first). Blank nicknames are skipped.
    pub fn parse(rows: &[Vec<String>]) -> Result<Leaderboard, BoundaryError> {
        let Some((headers, data)) = rows.split_first() else {
            return Ok(Leaderboard::default());
        };
        let cols = Self::locate(headers)?;
        let entries = data
            .iter()
            .filter_map(|row| {
                let nickname = row.get(cols.nickname)?.clone();
                if nickname.is_empty() {
                    return None;
                }
                Some(LeaderboardEntry::new(
                    nickname,
                    count(row.get(cols.total)),
                    count(row.get(cols.wins_human)),
                    count(row.get(cols.wins_ai)),
                    count(row.get(cols.draws)),
                ))
            })
            .collect();
        Ok(Leaderboard::new(entries))
    }

    /// Works out the writes for `result`: increment counters on the
    /// nickname's first matching row, or append a fresh row.
    pub fn plan_update(
        rows: &[Vec<String>],
        sheet: &str,
        nickname: &str,
        result: GameResult,
    ) -> Result<SheetUpdate, BoundaryError> {
        let headers = rows.first().ok_or_else(|| {
            BoundaryError::new(BoundaryErrorKind::Decode, "Leaderboard sheet has no header row")
        })?;
        let cols = Self::locate(headers)?;
        let counter = match result {
            GameResult::Win => cols.wins_human,
            GameResult::Lose => cols.wins_ai,
            GameResult::Draw => cols.draws,
        };

        let existing = rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.get(cols.nickname).map(String::as_str) == Some(nickname));

        if let Some((i, row)) = existing {
            let sheet_row = i + 1;
            let cell = |col: usize| format!("'{}'!{}{}", sheet, column_letter(col), sheet_row);
            return Ok(SheetUpdate::Cells(vec![
                (cell(cols.total), count(row.get(cols.total)) + 1),
                (cell(counter), count(row.get(counter)) + 1),
            ]));
        }

        let mut new_row = vec![Value::String(String::new()); cols.width];
        new_row[cols.nickname] = Value::String(nickname.to_string());
        new_row[cols.total] = json!(1);
        for col in [cols.wins_human, cols.wins_ai, cols.draws] {
            new_row[col] = json!(if col == counter { 1 } else { 0 });
        }
        Ok(SheetUpdate::Append(new_row))
    }
}

/// Client for the game spreadsheet: history and leaderboard worksheets.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    context: Arc<GoogleContext>,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Resolves the spreadsheet and checks that both worksheets exist.
    ///
    /// # Errors
    ///
    /// [`BoundaryError`] if the spreadsheet or a worksheet cannot be found or
    /// the API is unreachable. Callers treat this as fatal.
    #[instrument(skip(context))]
    pub async fn open(context: Arc<GoogleContext>) -> Result<Self, BoundaryError> {
        let spreadsheet_id = match context.config().spreadsheet_id() {
            Some(id) => id.clone(),
            None => Self::find_by_name(&context).await?,
        };

        let mut url = api_url(SHEETS_API, &[spreadsheet_id.as_str()])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties.title");
        let meta: SpreadsheetMeta = context.send_json(context.get(url)).await?;
        let titles: Vec<&str> = meta.sheets.iter().map(|s| s.properties.title.as_str()).collect();
        for required in [
            context.config().leaderboard_sheet(),
            context.config().history_sheet(),
        ] {
            if !titles.contains(&required.as_str()) {
                return Err(BoundaryError::not_found(format!(
                    "Worksheet '{}' was not found in the spreadsheet",
                    required
                )));
            }
        }

        info!(spreadsheet_id = %spreadsheet_id, "Spreadsheet opened");
        Ok(Self {
            context,
            spreadsheet_id,
        })
    }

    async fn find_by_name(context: &GoogleContext) -> Result<String, BoundaryError> {
        let name = context.config().spreadsheet_name();
        let mut url = api_url(DRIVE_API, &[])?;
        url.query_pairs_mut()
            .append_pair(
                "q",
                &format!(
                    "name = {} and mimeType = {} and trashed = false",
                    query_literal(name),
                    query_literal(SPREADSHEET_MIME)
                ),
            )
            .append_pair("pageSize", "10")
            .append_pair("fields", "files(id)");
        let list: FileList = context.send_json(context.get(url)).await?;
        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| {
                BoundaryError::not_found(format!("The spreadsheet '{}' was not found", name))
            })
    }

    fn range(sheet: &str) -> String {
        format!("'{}'", sheet)
    }

    /// Reads every populated row of `sheet` as text.
    #[instrument(skip(self))]
    pub async fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, BoundaryError> {
        let url = api_url(
            SHEETS_API,
            &[self.spreadsheet_id.as_str(), "values", Self::range(sheet).as_str()],
        )?;
        let range: ValueRange = self.context.send_json(self.context.get(url)).await?;
        debug!(rows = range.values.len(), "Rows read");
        Ok(to_text_rows(range.values))
    }

    /// Appends one row after the last populated row of `sheet`.
    #[instrument(skip(self, row))]
    pub async fn append_row(&self, sheet: &str, row: Vec<Value>) -> Result<(), BoundaryError> {
        let target = format!("{}:append", Self::range(sheet));
        let mut url = api_url(
            SHEETS_API,
            &[self.spreadsheet_id.as_str(), "values", target.as_str()],
        )?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = json!({ "values": [row] });
        self.context.send(self.context.post(url).json(&body)).await?;
        Ok(())
    }

    /// Writes several single cells in one request.
    #[instrument(skip(self, cells), fields(cells = cells.len()))]
    pub async fn write_cells(&self, cells: &[(String, u32)]) -> Result<(), BoundaryError> {
        let url = api_url(SHEETS_API, &[self.spreadsheet_id.as_str(), "values:batchUpdate"])?;
        let data: Vec<Value> = cells
            .iter()
            .map(|(range, value)| json!({ "range": range, "values": [[value]] }))
            .collect();
        let body = json!({ "valueInputOption": "RAW", "data": data });
        self.context.send(self.context.post(url).json(&body)).await?;
        Ok(())
    }
}

#[async_trait]
impl HistorySink for SheetsClient {
    #[instrument(skip(self))]
    async fn read_history(&self) -> Result<Vec<TrainingRecord>, BoundaryError> {
        let rows = self.read_rows(self.context.config().history_sheet()).await?;
        if rows.is_empty() {
            info!("The history worksheet is empty");
        }
        Ok(parse_history(&rows))
    }

    #[instrument(skip(self, record), fields(position = record.position()))]
    async fn append_record(&self, record: &TrainingRecord) -> Result<(), BoundaryError> {
        let row = vec![
            Value::String(record.state_string()),
            json!(record.position()),
        ];
        self.append_row(self.context.config().history_sheet(), row).await
    }
}

#[async_trait]
impl LeaderboardStore for SheetsClient {
    #[instrument(skip(self))]
    async fn read_leaderboard(&self) -> Result<Leaderboard, BoundaryError> {
        let rows = self.read_rows(self.context.config().leaderboard_sheet()).await?;
        LeaderboardColumns::parse(&rows)
    }

    #[instrument(skip(self))]
    async fn update_leaderboard(
        &self,
        nickname: &str,
        result: GameResult,
    ) -> Result<(), BoundaryError> {
        let sheet = self.context.config().leaderboard_sheet();
        let rows = self.read_rows(sheet).await?;
        match LeaderboardColumns::plan_update(&rows, sheet, nickname, result)? {
            SheetUpdate::Cells(cells) => {
                debug!("Updating existing leaderboard row");
                self.write_cells(&cells).await
            }
            SheetUpdate::Append(row) => {
                warn!(nickname, "First appearance, appending leaderboard row");
                self.append_row(sheet, row).await
            }
        }
    }
}
