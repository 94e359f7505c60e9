use std::io::{self, Write};

use anyhow::Context;
use osu_schema::{Chart, Difficulty, KindCounts, Metadata, Milliseconds, StrainSeries, WindowedSeries};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StrainReport<'a> {
    pub meta: &'a Metadata,
    pub difficulty: &'a Difficulty,
    pub kind_counts: KindCounts,
    pub window_size_ms: Milliseconds,
    pub objects: Vec<ObjectStrain>,
    pub windows: Vec<WindowStrain>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ObjectStrain {
    pub time: Milliseconds,
    pub aim: f64,
    pub speed: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WindowStrain {
    pub end: Milliseconds,
    pub aim: f64,
    pub speed: f64,
}

impl<'a> StrainReport<'a> {
    pub fn new(chart: &'a Chart, strains: &StrainSeries, windows: &WindowedSeries) -> Self {
        let objects = chart
            .hit_objects
            .iter()
            .zip(strains.aim.iter().zip(&strains.speed))
            .map(|(obj, (&aim, &speed))| ObjectStrain {
                time: obj.time,
                aim,
                speed,
            })
            .collect();
        let windows_out = windows
            .aim
            .iter()
            .zip(&windows.speed)
            .enumerate()
            .map(|(i, (&aim, &speed))| WindowStrain {
                end: windows.window_end(i),
                aim,
                speed,
            })
            .collect();

        Self {
            meta: &chart.meta,
            difficulty: &chart.difficulty,
            kind_counts: chart.kind_counts(),
            window_size_ms: windows.window_size_ms,
            objects,
            windows: windows_out,
        }
    }
}

/// `<i>) <title> [<version>](mode:<mode>)`
pub fn write_listing(out: &mut impl Write, index: usize, chart: &Chart) -> io::Result<()> {
    writeln!(
        out,
        "{index}) {} [{}](mode:{})",
        chart.meta.name, chart.meta.version_label, chart.meta.game_mode
    )
}

/// Per-object block, a blank line, then the per-window block keyed by window end.
pub fn write_text(
    out: &mut impl Write,
    chart: &Chart,
    strains: &StrainSeries,
    windows: &WindowedSeries,
) -> io::Result<()> {
    let report = StrainReport::new(chart, strains, windows);
    for o in &report.objects {
        writeln!(out, "{:.6}\t{:.6}\t{:.6}", o.time, o.aim, o.speed)?;
    }
    writeln!(out)?;
    for w in &report.windows {
        writeln!(out, "{:.6}\t{:.6}\t{:.6}", w.end, w.aim, w.speed)?;
    }
    Ok(())
}

pub fn write_json(
    out: &mut impl Write,
    chart: &Chart,
    strains: &StrainSeries,
    windows: &WindowedSeries,
) -> anyhow::Result<()> {
    let report = StrainReport::new(chart, strains, windows);
    serde_json::to_writer_pretty(&mut *out, &report).context("failed to serialize report")?;
    writeln!(out).context("failed to write output")?;
    Ok(())
}
