use super::*;
use std::str::FromStr;

#[test]
fn test_combine_order_starts_at_root_and_ends_at_vendor() {
    assert_eq!(GroupName::COMBINE_ORDER.first(), Some(&GroupName::TopLevel));
    assert_eq!(GroupName::COMBINE_ORDER.last(), Some(&GroupName::Vendor));
    assert_eq!(GroupName::COMBINE_ORDER.len(), 8);
}

#[test]
fn test_storage_paths() {
    assert_eq!(GroupName::TopLevel.storage_path(), None);
    assert_eq!(GroupName::Sonar.storage_path(), Some("Sonar"));
    assert_eq!(GroupName::PlatformNmea.storage_path(), Some("Platform/NMEA"));
}

#[test]
fn test_nmea_absent_for_azfp() {
    assert!(GroupName::PlatformNmea.present_for(SonarModel::Ek60));
    assert!(GroupName::PlatformNmea.present_for(SonarModel::Ek80));
    assert!(!GroupName::PlatformNmea.present_for(SonarModel::Azfp));
    assert!(GroupName::Platform.present_for(SonarModel::Azfp));
}

#[test]
fn test_sonar_model_parse() {
    assert_eq!(SonarModel::from_str("EK60"), Ok(SonarModel::Ek60));
    assert_eq!(SonarModel::from_str("ek80"), Ok(SonarModel::Ek80));
    // EA640 records through the EK80 stack
    assert_eq!(SonarModel::from_str("EA640"), Ok(SonarModel::Ek80));
    assert!(SonarModel::from_str("EK500").is_err());
}

#[test]
fn test_sonar_model_serde_labels() {
    let json = serde_json::to_string(&SonarModel::Azfp).unwrap();
    assert_eq!(json, "\"AZFP\"");
    let back: SonarModel = serde_json::from_str("\"EK60\"").unwrap();
    assert_eq!(back, SonarModel::Ek60);
}

#[test]
fn test_time_axes() {
    assert!(axes::is_time_axis(axes::PING_TIME));
    assert!(axes::is_time_axis(axes::MRU_TIME));
    assert!(!axes::is_time_axis(axes::FREQUENCY));
    assert!(!axes::is_time_axis(axes::RANGE_BIN));
}
