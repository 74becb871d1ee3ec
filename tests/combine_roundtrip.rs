//! End-to-end combination tests over real two-file fixtures.
//!
//! These build complete converted containers the way the per-file converter
//! collaborators would, combine them through the public API, and re-read the
//! output through the store and the logical dataset pointers.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::tempdir;

use echomerge::combine::{combine, combine_with_progress, provenance, CombineError, CombineEvent};
use echomerge::container::{ArrayData, AttrValue, Axis, DataField, Group};
use echomerge::echodata::EchoData;
use echomerge::schema::{GroupName, SonarModel};
use echomerge::store::{
    combined_output_path, ContainerReader, ContainerWriter, EncodingPlan, SaveFormat,
};

const BINS: usize = 10;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 9, 12, 10, 0, 0).unwrap()
}

fn seconds(start: i64, n: usize) -> Vec<DateTime<Utc>> {
    (0..n)
        .map(|i| t0() + Duration::seconds(start + i as i64))
        .collect()
}

fn time_axis(name: &str, start: i64, n: usize) -> Axis {
    Axis::new(name, ArrayData::timestamps_1d(seconds(start, n)))
        .with_attr("axis", "T")
        .with_attr("calendar", "gregorian")
        .with_attr("standard_name", "time")
}

fn frequency_axis() -> Axis {
    Axis::new("frequency", ArrayData::f64_1d(vec![38000.0]))
        .with_attr("units", "Hz")
        .with_attr("long_name", "Transducer frequency")
}

fn toplevel() -> Group {
    Group::builder()
        .attr("keywords", "EK60")
        .attr("sonar_convention_authority", "ICES")
        .build()
}

fn sonar() -> Group {
    Group::builder()
        .attr("sonar_manufacturer", "Simrad")
        .attr("sonar_model", "EK60")
        .attr("sonar_type", "echosounder")
        .build()
}

fn environment(start: i64, pings: usize) -> Group {
    Group::builder()
        .axis(time_axis("ping_time", start, pings))
        .axis(frequency_axis())
        .field(
            DataField::new(
                "absorption_indicative",
                vec!["ping_time"],
                ArrayData::f64_1d(vec![0.0098; pings]),
            )
            .with_attr("units", "dB/m"),
        )
        .field(
            DataField::new(
                "sound_speed_indicative",
                vec!["ping_time"],
                ArrayData::f64_1d(vec![1488.1; pings]),
            )
            .with_attr("units", "m/s"),
        )
        .build()
}

fn beam(start: i64, pings: usize) -> Group {
    let samples: Vec<f64> = (0..pings * BINS).map(|i| -(i as f64) * 0.25).collect();
    Group::builder()
        .axis(frequency_axis())
        .axis(time_axis("ping_time", start, pings))
        .axis(Axis::new("range_bin", ArrayData::i64_1d((0..BINS as i64).collect())))
        .field(
            DataField::new(
                "backscatter_r",
                vec!["frequency", "ping_time", "range_bin"],
                ArrayData::f64_nd(vec![1, pings, BINS], samples),
            )
            .with_attr("long_name", "Backscatter power")
            .with_attr("units", "dB"),
        )
        .field(DataField::new(
            "channel_id",
            vec!["frequency"],
            ArrayData::text_1d(vec!["GPT  38 kHz 009072058c8d 1-1 ES38B"]),
        ))
        .field(DataField::new(
            "gpt_software_version",
            vec!["frequency"],
            ArrayData::text_1d(vec!["070413.1104"]),
        ))
        .field(
            DataField::new(
                "gain_correction",
                vec!["frequency"],
                ArrayData::f64_1d(vec![25.6]),
            )
            .with_attr("units", "dB"),
        )
        .attr("beam_mode", "vertical")
        .attr("conversion_equation_t", "type_3")
        .build()
}

fn platform(start: i64, pings: usize, fixes: usize) -> Group {
    Group::builder()
        .axis(time_axis("ping_time", start, pings))
        .axis(time_axis("location_time", start, fixes))
        .field(DataField::new(
            "pitch",
            vec!["ping_time"],
            ArrayData::f64_1d(vec![0.5; pings]),
        ))
        .field(DataField::new(
            "latitude",
            vec!["location_time"],
            ArrayData::f64_1d(vec![47.6; fixes]),
        ))
        .field(DataField::new(
            "water_level",
            vec![],
            ArrayData::scalar_f64(0.0),
        ))
        .attr("platform_name", "RV Example")
        .build()
}

fn nmea(start: i64, fixes: usize) -> Group {
    let sentences: Vec<String> = (0..fixes)
        .map(|i| format!("$GPGGA,{:06}.00,4736.00,N,12220.{i},W", start + i as i64))
        .collect();
    Group::builder()
        .axis(time_axis("location_time", start, fixes))
        .field(DataField::new(
            "NMEA_datagram",
            vec!["location_time"],
            ArrayData::text_1d(sentences),
        ))
        .build()
}

fn vendor() -> Group {
    Group::builder()
        .axis(frequency_axis())
        .axis(Axis::new("pulse_length_bin", ArrayData::i64_1d((0..5).collect())))
        .field(DataField::new(
            "sa_correction",
            vec!["frequency", "pulse_length_bin"],
            ArrayData::f64_nd(vec![1, 5], vec![-0.7, -0.6, -0.5, -0.4, -0.3]),
        ))
        .field(DataField::new(
            "pulse_length",
            vec!["frequency", "pulse_length_bin"],
            ArrayData::f64_nd(vec![1, 5], vec![0.000256, 0.000512, 0.001024, 0.002048, 0.004096]),
        ))
        .build()
}

/// A complete converted EK60 container, as the per-file converter produces.
fn write_ek60(path: &Path, start: i64, pings: usize, fixes: usize) {
    let format = SaveFormat::from_path(path).unwrap();
    let mut writer = ContainerWriter::create(path, format, SonarModel::Ek60).unwrap();
    let groups: Vec<(GroupName, Group)> = vec![
        (GroupName::TopLevel, toplevel()),
        (GroupName::Sonar, sonar()),
        (GroupName::Provenance, provenance::synthesize(&[path.to_path_buf()])),
        (GroupName::Environment, environment(start, pings)),
        (GroupName::Beam, beam(start, pings)),
        (GroupName::Platform, platform(start, pings, fixes)),
        (GroupName::PlatformNmea, nmea(start, fixes)),
        (GroupName::Vendor, vendor()),
    ];
    for (name, group) in &groups {
        writer.write_group(*name, group, &EncodingPlan::none()).unwrap();
    }
    writer.finish().unwrap();
}

fn combine_two(dir: &Path, format: SaveFormat) -> (Vec<PathBuf>, PathBuf) {
    let ext = format.extension();
    let a = dir.join(format!("leg1.{ext}"));
    let b = dir.join(format!("leg2.{ext}"));
    write_ek60(&a, 0, 100, 10);
    write_ek60(&b, 1000, 150, 15);
    let inputs = vec![a, b];
    let output = combined_output_path(&inputs[0]);
    combine(SonarModel::Ek60, &inputs, &output, format).unwrap();
    (inputs, output)
}

#[test]
fn test_ek60_two_file_combine_single_file_format() {
    let dir = tempdir().unwrap();
    let (_, output) = combine_two(dir.path(), SaveFormat::SingleFile);
    assert!(output.is_file());
    assert!(output.file_name().unwrap().to_str().unwrap().contains("__combined"));
}

#[test]
fn test_ek60_beam_ping_counts_and_text_widths() {
    let dir = tempdir().unwrap();
    let (_, output) = combine_two(dir.path(), SaveFormat::Chunked);

    let mut reader = ContainerReader::open(&output).unwrap();
    let beam = reader.read_group(GroupName::Beam).unwrap();

    // 100 + 150 pings, in input order
    let ping = beam.axis("ping_time").unwrap();
    assert_eq!(ping.len(), 250);
    assert_eq!(
        ping.attrs.get("units"),
        Some(&AttrValue::Text("seconds since 1900-01-01".into()))
    );
    match &ping.values {
        ArrayData::Float64 { values, .. } => {
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
        }
        other => panic!("expected normalized seconds, got {}", other.dtype_label()),
    }

    let backscatter = beam.field("backscatter_r").unwrap();
    assert_eq!(backscatter.data.shape(), &[1, 250, BINS]);

    // EK60 text coercions: software version to 10 bytes, channel id to 50
    let version = beam.field("gpt_software_version").unwrap();
    assert_eq!(version.data.text_width(), Some(10));
    match &version.data {
        ArrayData::Text { values, .. } => assert_eq!(values[0], "070413.110"),
        _ => panic!("expected text"),
    }
    let channel = beam.field("channel_id").unwrap();
    assert_eq!(channel.data.text_width(), Some(50));
    match &channel.data {
        ArrayData::Text { values, .. } => {
            assert_eq!(values[0], "GPT  38 kHz 009072058c8d 1-1 ES38B")
        }
        _ => panic!("expected text"),
    }

    // Environment concatenates to the same total
    let env = reader.read_group(GroupName::Environment).unwrap();
    assert_eq!(env.axis("ping_time").unwrap().len(), 250);
    assert_eq!(env.field("sound_speed_indicative").unwrap().data.len(), 250);

    // EK60 Platform concatenates jointly along location_time and ping_time
    let plat = reader.read_group(GroupName::Platform).unwrap();
    assert_eq!(plat.axis("ping_time").unwrap().len(), 250);
    assert_eq!(plat.axis("location_time").unwrap().len(), 25);
    assert_eq!(plat.field("pitch").unwrap().data.len(), 250);
    assert_eq!(plat.field("latitude").unwrap().data.len(), 25);
    // Scalar shared across files, stored once
    assert_eq!(plat.field("water_level").unwrap().data, ArrayData::scalar_f64(0.0));

    // NMEA datagrams are concatenated and pinned to a fixed width
    let nmea_group = reader.read_group(GroupName::PlatformNmea).unwrap();
    let datagrams = nmea_group.field("NMEA_datagram").unwrap();
    assert_eq!(datagrams.data.len(), 25);
    assert!(datagrams.data.text_width().is_some());
}

#[test]
fn test_take_first_groups_match_first_input() {
    let dir = tempdir().unwrap();
    let (inputs, output) = combine_two(dir.path(), SaveFormat::Chunked);

    let mut first = ContainerReader::open(&inputs[0]).unwrap();
    let mut combined = ContainerReader::open(&output).unwrap();

    for group in [GroupName::TopLevel, GroupName::Sonar] {
        assert_eq!(
            combined.read_group(group).unwrap(),
            first.read_group(group).unwrap(),
            "{group} group must come verbatim from the first input"
        );
    }
}

#[test]
fn test_provenance_reflects_latest_call() {
    let dir = tempdir().unwrap();
    let (inputs, output) = combine_two(dir.path(), SaveFormat::Chunked);

    let mut reader = ContainerReader::open(&output).unwrap();
    let prov = reader.read_group(GroupName::Provenance).unwrap();

    assert_eq!(
        prov.attrs.get(provenance::CONVERSION_SOFTWARE_NAME),
        Some(&AttrValue::Text("echomerge".into()))
    );
    let sources: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
    assert_eq!(
        prov.attrs.get(provenance::SRC_FILENAMES),
        Some(&AttrValue::TextList(sources))
    );
    let time = prov
        .attrs
        .get(provenance::CONVERSION_TIME)
        .and_then(AttrValue::as_text)
        .unwrap();
    assert!(time.ends_with('Z'));
}

#[test]
fn test_recombine_is_deterministic_outside_provenance() {
    let dir = tempdir().unwrap();
    let (inputs, output1) = combine_two(dir.path(), SaveFormat::Chunked);
    let output2 = dir.path().join("again.zarr");
    combine(SonarModel::Ek60, &inputs, &output2, SaveFormat::Chunked).unwrap();

    let mut r1 = ContainerReader::open(&output1).unwrap();
    let mut r2 = ContainerReader::open(&output2).unwrap();
    for group in GroupName::COMBINE_ORDER {
        if group == GroupName::Provenance {
            let mut p1 = r1.read_group(group).unwrap();
            let mut p2 = r2.read_group(group).unwrap();
            p1.attrs.remove(provenance::CONVERSION_TIME);
            p2.attrs.remove(provenance::CONVERSION_TIME);
            assert_eq!(p1, p2);
            continue;
        }
        assert_eq!(
            r1.read_group(group).unwrap(),
            r2.read_group(group).unwrap(),
            "{group} group must combine deterministically"
        );
    }
}

#[test]
fn test_progress_events_cover_every_group() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("leg1.zarr");
    let b = dir.path().join("leg2.zarr");
    write_ek60(&a, 0, 20, 2);
    write_ek60(&b, 500, 30, 3);
    let output = dir.path().join("out.zarr");

    let mut events = Vec::new();
    combine_with_progress(
        SonarModel::Ek60,
        &[a, b],
        &output,
        SaveFormat::Chunked,
        &mut |event| events.push(event.clone()),
    )
    .unwrap();

    assert_eq!(events.first(), Some(&CombineEvent::Started { inputs: 2 }));
    assert_eq!(
        events.last(),
        Some(&CombineEvent::Completed { output: output.clone() })
    );
    let written: Vec<GroupName> = events
        .iter()
        .filter_map(|e| match e {
            CombineEvent::GroupWritten { group } => Some(*group),
            _ => None,
        })
        .collect();
    assert_eq!(written, GroupName::COMBINE_ORDER.to_vec());
}

#[test]
fn test_combined_output_readable_through_pointer() {
    let dir = tempdir().unwrap();
    let (_, output) = combine_two(dir.path(), SaveFormat::Chunked);

    let mut session = EchoData::open_raw(output.as_path()).unwrap();
    let beam = session.raw_group(GroupName::Beam).unwrap().unwrap();
    assert_eq!(beam.axis("ping_time").unwrap().len(), 250);
    // Derived products remain an expected absence
    assert!(session.sv().is_none());
}

// ==================== AZFP ====================

fn write_azfp(path: &Path, start: i64, pings: usize, platform_name: &str) {
    let env = Group::builder()
        .axis(time_axis("ping_time", start, pings))
        .field(DataField::new(
            "temperature",
            vec!["ping_time"],
            ArrayData::f64_1d(vec![6.2; pings]),
        ))
        .build();
    let beam_group = Group::builder()
        .axis(Axis::new("frequency", ArrayData::f64_1d(vec![125000.0])))
        .axis(time_axis("ping_time", start, pings))
        .axis(Axis::new("range_bin", ArrayData::i64_1d((0..4).collect())))
        .field(DataField::new(
            "backscatter_r",
            vec!["frequency", "ping_time", "range_bin"],
            ArrayData::f64_nd(vec![1, pings, 4], vec![-40.0; pings * 4]),
        ))
        .build();
    // AZFP platforms are static deployment metadata: no time axes at all
    let platform_group = Group::builder()
        .attr("platform_name", platform_name)
        .attr("platform_type", "subsurface mooring")
        .field(DataField::new("water_level", vec![], ArrayData::scalar_f64(0.0)))
        .build();
    let vendor_group = Group::builder()
        .axis(Axis::new("frequency", ArrayData::f64_1d(vec![125000.0])))
        .field(DataField::new("EL", vec!["frequency"], ArrayData::f64_1d(vec![142.5])))
        .build();

    let mut writer =
        ContainerWriter::create(path, SaveFormat::from_path(path).unwrap(), SonarModel::Azfp)
            .unwrap();
    writer.write_group(GroupName::TopLevel, &Group::builder().attr("keywords", "AZFP").build(), &EncodingPlan::none()).unwrap();
    writer.write_group(GroupName::Sonar, &Group::builder().attr("sonar_manufacturer", "ASL").build(), &EncodingPlan::none()).unwrap();
    writer.write_group(GroupName::Provenance, &provenance::synthesize(&[path.to_path_buf()]), &EncodingPlan::none()).unwrap();
    writer.write_group(GroupName::Environment, &env, &EncodingPlan::none()).unwrap();
    writer.write_group(GroupName::Beam, &beam_group, &EncodingPlan::none()).unwrap();
    writer.write_group(GroupName::Platform, &platform_group, &EncodingPlan::none()).unwrap();
    writer.write_group(GroupName::Vendor, &vendor_group, &EncodingPlan::none()).unwrap();
    writer.finish().unwrap();
}

#[test]
fn test_azfp_platform_identical_merge_succeeds() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.zarr");
    let b = dir.path().join("b.zarr");
    write_azfp(&a, 0, 10, "mooring-12");
    write_azfp(&b, 100, 10, "mooring-12");
    let output = dir.path().join("out.zarr");
    combine(SonarModel::Azfp, &[a, b], &output, SaveFormat::Chunked).unwrap();

    let mut reader = ContainerReader::open(&output).unwrap();
    // No NMEA group for AZFP
    assert!(!reader.has_group(GroupName::PlatformNmea).unwrap());
    let plat = reader.read_group(GroupName::Platform).unwrap();
    assert_eq!(
        plat.attrs.get("platform_name"),
        Some(&AttrValue::Text("mooring-12".into()))
    );
    // Beam still concatenates along ping_time
    let beam_group = reader.read_group(GroupName::Beam).unwrap();
    assert_eq!(beam_group.axis("ping_time").unwrap().len(), 20);
}

#[test]
fn test_azfp_platform_conflict_fails_with_group_tag() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.zarr");
    let b = dir.path().join("b.zarr");
    write_azfp(&a, 0, 10, "mooring-12");
    write_azfp(&b, 100, 10, "mooring-13");
    let output = dir.path().join("out.zarr");
    let err = combine(SonarModel::Azfp, &[a, b], &output, SaveFormat::Chunked).unwrap_err();
    match err {
        CombineError::ConflictingMetadata { group, key, .. } => {
            assert_eq!(group, GroupName::Platform);
            assert_eq!(key, "platform_name");
        }
        other => panic!("expected ConflictingMetadata, got {other}"),
    }
    // Groups combined before the failure are left on disk, not rolled back
    assert!(output.exists());
}

#[test]
fn test_time_overlap_across_files_is_rejected() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.zarr");
    let b = dir.path().join("b.zarr");
    // Second file starts inside the first file's ping range
    write_ek60(&a, 0, 100, 10);
    write_ek60(&b, 50, 100, 10);
    let output = dir.path().join("out.zarr");
    let err = combine(SonarModel::Ek60, &[a, b], &output, SaveFormat::Chunked).unwrap_err();
    assert!(matches!(err, CombineError::TimeOrderingViolation { .. }));
}

fn mini_ek60(path: &Path, channel: &str) {
    let beam_group = Group::builder()
        .axis(frequency_axis())
        .axis(time_axis("ping_time", 0, 2))
        .axis(Axis::new("range_bin", ArrayData::i64_1d(vec![0, 1])))
        .field(DataField::new(
            "channel_id",
            vec!["frequency"],
            ArrayData::text_1d(vec![channel]),
        ))
        .build();
    let mut writer =
        ContainerWriter::create(path, SaveFormat::from_path(path).unwrap(), SonarModel::Ek60)
            .unwrap();
    writer
        .write_group(GroupName::TopLevel, &Group::new(), &EncodingPlan::none())
        .unwrap();
    writer
        .write_group(GroupName::Beam, &beam_group, &EncodingPlan::none())
        .unwrap();
    writer.finish().unwrap();
}

#[test]
fn test_channel_mismatch_is_schema_error() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.zarr");
    let b = dir.path().join("b.zarr");
    mini_ek60(&a, "GPT  38 kHz 009072058c8d 1-1 ES38B");
    mini_ek60(&b, "GPT 120 kHz 00907205a6d0 4-1 ES120-7C");
    let output = dir.path().join("out.zarr");
    let err = combine(SonarModel::Ek60, &[a, b], &output, SaveFormat::Chunked).unwrap_err();
    match err {
        CombineError::SchemaMismatch { group, detail } => {
            assert_eq!(group, Some(GroupName::Beam));
            assert!(detail.contains("channel set"));
        }
        other => panic!("expected SchemaMismatch, got {other}"),
    }
}
