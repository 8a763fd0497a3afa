//! CSV export of stored player progress for server operators.

use crate::store::JsonFileStore;
use crate::{PlayerProgressRecord, Result};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct ProgressRow {
    pub player_id: String,
    pub job_id: String,
    pub level: u32,
    pub current_xp: u64,
    pub total_xp: u64,
}

/// Flatten records into rows, one per (player, job)
pub fn rows_for(records: &[PlayerProgressRecord]) -> Vec<ProgressRow> {
    records
        .iter()
        .flat_map(|record| {
            record.entries().map(move |(job_id, progress)| ProgressRow {
                player_id: record.player_id.to_string(),
                job_id: job_id.to_string(),
                level: progress.level,
                current_xp: progress.current_xp,
                total_xp: progress.total_xp,
            })
        })
        .collect()
}

/// Write every record in `store` to `csv_path`, replacing the file
///
/// Returns the number of rows written.
pub fn export_progress(store: &JsonFileStore, csv_path: &Path) -> Result<usize> {
    let records = store.load_all()?;
    let rows = rows_for(&records);

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(csv_path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        // Keep the header so empty exports are still valid CSV
        writer.write_record(["player_id", "job_id", "level", "current_xp", "total_xp"])?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!(
        "Exported {} rows for {} players to {:?}",
        rows.len(),
        records.len(),
        csv_path
    );
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProgressStore;
    use crate::PlayerId;

    fn record(levels: &[(&str, u32)]) -> PlayerProgressRecord {
        let mut record = PlayerProgressRecord::new(PlayerId::new_v4());
        for (job, level) in levels {
            record.set_level(job, *level);
            record.set_total_xp(job, u64::from(*level) * 10);
        }
        record
    }

    #[test]
    fn test_rows_for_flattens_jobs() {
        let records = vec![record(&[("farmer", 2), ("miner", 5)]), record(&[("miner", 1)])];
        let rows = rows_for(&records);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].job_id, "farmer");
        assert_eq!(rows[1].level, 5);
        assert_eq!(rows[1].total_xp, 50);
        assert_eq!(rows[2].player_id, records[1].player_id.to_string());
    }

    #[test]
    fn test_export_writes_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("players"));
        store.save(&record(&[("miner", 4)])).unwrap();
        store.save(&record(&[("miner", 9), ("farmer", 3)])).unwrap();

        let csv_path = temp_dir.path().join("out/progress.csv");
        let count = export_progress(&store, &csv_path).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let rows: Vec<ProgressRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().any(|r| r.job_id == "farmer" && r.level == 3));
    }

    #[test]
    fn test_export_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("players"));
        let csv_path = temp_dir.path().join("progress.csv");

        assert_eq!(export_progress(&store, &csv_path).unwrap(), 0);
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with("player_id,job_id,level,current_xp,total_xp"));
    }
}
