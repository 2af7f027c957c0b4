use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use course_tidy::config::CONFIG_ENV;
use course_tidy::{load_config_from_xml_path, resolve_config, LogLevel, PruneOrder};

#[test]
fn full_config_is_read() {
    let td = tempdir().unwrap();
    let p = td.path().join("config.xml");
    fs::write(
        &p,
        r#"<config>
  <log_level>debug</log_level>
  <log_file>/var/log/tidy.log</log_file>
  <prune_order>never</prune_order>
  <completed_name>Done</completed_name>
  <markers>
    <marker>Braille</marker>
  </markers>
  <ignored_file>Thumbs.db</ignored_file>
  <archive_extension>.ZIP</archive_extension>
  <unit_suffix>-CT</unit_suffix>
  <index_file>tree.json</index_file>
</config>"#,
    )
    .unwrap();

    let cfg = load_config_from_xml_path(&p).unwrap();
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.prune_order, PruneOrder::Never);
    assert_eq!(cfg.taxonomy.completed_name, "Done");
    assert_eq!(cfg.taxonomy.markers, vec!["Braille"]);
    assert_eq!(cfg.taxonomy.ignored_file, "Thumbs.db");
    assert_eq!(cfg.taxonomy.archive_extension, "ZIP");
    assert_eq!(cfg.unit_suffix.as_deref(), Some("-CT"));
    assert_eq!(cfg.index_file, "tree.json");
}

#[test]
fn malformed_xml_errors() {
    let td = tempdir().unwrap();
    let p = td.path().join("config.xml");
    fs::write(&p, "<config>\n  <log_level>normal\n</config>").unwrap();
    let err = load_config_from_xml_path(&p).unwrap_err();
    assert!(format!("{err}").contains("parse config xml"));
}

#[test]
fn empty_markers_list_is_rejected() {
    let td = tempdir().unwrap();
    let p = td.path().join("config.xml");
    fs::write(&p, "<config><markers></markers></config>").unwrap();
    assert!(load_config_from_xml_path(&p).is_err());
}

#[test]
#[serial]
fn env_var_selects_the_config_file() {
    let td = tempdir().unwrap();
    let p = td.path().join("from_env.xml");
    fs::write(&p, "<config><completed_name>Finished</completed_name></config>").unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &p);
    }
    let cfg = resolve_config(None);
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    assert_eq!(cfg.unwrap().unwrap().taxonomy.completed_name, "Finished");
}

#[test]
#[serial]
fn env_var_pointing_nowhere_is_an_error() {
    let td = tempdir().unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, td.path().join("missing.xml"));
    }
    let result = resolve_config(None);
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
    assert!(result.is_err());
}

#[test]
#[serial]
fn explicit_path_beats_env_var() {
    let td = tempdir().unwrap();
    let env_cfg = td.path().join("env.xml");
    let flag_cfg = td.path().join("flag.xml");
    fs::write(&env_cfg, "<config><completed_name>Env</completed_name></config>").unwrap();
    fs::write(&flag_cfg, "<config><completed_name>Flag</completed_name></config>").unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &env_cfg);
    }
    let cfg = resolve_config(Some(&flag_cfg));
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
    assert_eq!(cfg.unwrap().unwrap().taxonomy.completed_name, "Flag");
}
