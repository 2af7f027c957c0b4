use assert_fs::prelude::*;
use assert_fs::TempDir;
use serde_json::Value;
use std::fs;

use course_tidy::passes::index::write_index;
use course_tidy::Taxonomy;

#[test]
fn index_describes_tree_by_depth() {
    let root = TempDir::new().unwrap();
    root.child("Zoology/Lesson/img/a.png").touch().unwrap();
    root.child("Zoology/Lesson/Lesson.html").touch().unwrap();
    root.child("Art/.DS_Store").touch().unwrap();
    root.child(".git/config").touch().unwrap();

    write_index(root.path(), &Taxonomy::default(), "data.json", None).unwrap();
    let json: Value = serde_json::from_str(&fs::read_to_string(root.path().join("data.json")).unwrap()).unwrap();

    assert_eq!(json["type"], "directory");
    let units = json["children"].as_array().unwrap();
    let names: Vec<_> = units.iter().map(|u| u["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Art", "Zoology"]);
    assert_eq!(units[0]["type"], "course");
    assert_eq!(units[0]["children"].as_array().unwrap().len(), 0);

    let lesson = &units[1]["children"][0];
    assert_eq!(lesson["type"], "coursefolder");
    let lesson_children = lesson["children"].as_array().unwrap();
    assert_eq!(lesson_children[0]["name"], "Lesson.html");
    assert_eq!(lesson_children[0]["type"], "file");
    assert!(lesson_children[0].get("children").is_none());
    assert_eq!(lesson_children[1]["type"], "images");
}

#[test]
fn index_name_is_configurable_and_excluded() {
    let root = TempDir::new().unwrap();
    root.child("U/x.txt").touch().unwrap();

    write_index(root.path(), &Taxonomy::default(), "tree.json", None).unwrap();
    write_index(root.path(), &Taxonomy::default(), "tree.json", None).unwrap();
    let json: Value = serde_json::from_slice(&fs::read(root.path().join("tree.json")).unwrap()).unwrap();

    let top = json["children"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["name"], "U");
}
