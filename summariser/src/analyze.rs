use crate::frame::{StatsError, StatsTable, DESIGN_NAME, I_PLDDT, PLDDT, PTM};
use crate::model::{AcceptedDesign, MetricStats, TrajectoryStats};

/// Mean and max of one metric column. Empty cells are skipped.
pub(crate) fn metric_stats(table: &StatsTable, column: &str) -> Result<MetricStats, StatsError> {
    let values = table.metric(column)?;

    let mean = values.mean();
    let max = values
        .max::<f64>()
        .map_err(|source| table.read_error(source))?;

    match (mean, max) {
        (Some(mean), Some(max)) => Ok(MetricStats { mean, max }),
        _ => Err(StatsError::Schema {
            path: table.path().to_path_buf(),
            reason: format!("column `{column}` holds no values"),
        }),
    }
}

/// Summarise the trajectory table of a run.
///
/// A table without rows has no mean or maximum, so it is reported as
/// [StatsError::EmptyTable] rather than producing NaN.
pub fn trajectory_stats(table: &StatsTable) -> Result<TrajectoryStats, StatsError> {
    if table.height() == 0 {
        return Err(StatsError::EmptyTable {
            path: table.path().to_path_buf(),
        });
    }

    Ok(TrajectoryStats {
        count: table.height(),
        plddt: metric_stats(table, PLDDT)?,
        ptm: metric_stats(table, PTM)?,
        i_plddt: metric_stats(table, I_PLDDT)?,
    })
}

/// Read the rows of the final design table, in table order.
pub fn accepted_designs(table: &StatsTable) -> Result<Vec<AcceptedDesign>, StatsError> {
    let names = table.text(DESIGN_NAME)?;
    let names = names.str().map_err(|source| table.read_error(source))?;
    let plddt = table.metric(PLDDT)?;
    let plddt = plddt.f64().map_err(|source| table.read_error(source))?;
    let ptm = table.metric(PTM)?;
    let ptm = ptm.f64().map_err(|source| table.read_error(source))?;
    let i_plddt = table.metric(I_PLDDT)?;
    let i_plddt = i_plddt.f64().map_err(|source| table.read_error(source))?;

    (0..table.height())
        .map(|row| {
            let design_name = names.get(row).ok_or_else(|| StatsError::Schema {
                path: table.path().to_path_buf(),
                reason: format!("row {} has no `{DESIGN_NAME}`", row + 1),
            })?;

            Ok(AcceptedDesign {
                design_name: design_name.to_string(),
                plddt: plddt.get(row),
                ptm: ptm.get(row),
                i_plddt: i_plddt.get(row),
            })
        })
        .collect()
}
