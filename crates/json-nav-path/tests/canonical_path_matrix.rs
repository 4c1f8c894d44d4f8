use json_nav_path::{format_path, parse_path, parse_validated, path, Path, PathParseError, Segment};

#[test]
fn canonical_parse_format_roundtrip_matrix() {
    let cases = [
        "",
        "a",
        "a.b",
        "a.b[2].c",
        "[0]",
        "[0][1][2]",
        "[3].x",
        r#"["a.b"]"#,
        r#"x["0"]"#,
        r#"[""]"#,
        r#"["with space"].tail"#,
        r#"["café"]"#,
        r#"["quote\"inside"][7]"#,
        "$ref._id",
    ];

    for text in cases {
        let p = parse_path(text).expect(text);
        let out = p.to_string();
        let again = parse_path(&out).expect(&out);
        assert_eq!(again, p, "case {text}");
    }
}

#[test]
fn canonical_formatting_is_stable_for_engine_paths() {
    let cases: Vec<(Path, &str)> = vec![
        (Path::root(), ""),
        (path!["a"], "a"),
        (path!["a", "b", 2, "c"], "a.b[2].c"),
        (path![0, "a"], "[0].a"),
        (path!["a b"], r#"["a b"]"#),
        (path!["1"], r#"["1"]"#),
        (path!["a", "b.c", 0], r#"a["b.c"][0]"#),
    ];

    for (p, expected) in cases {
        assert_eq!(format_path(p.segments()), expected);
        assert_eq!(parse_path(expected).unwrap(), p);
    }
}

#[test]
fn numeric_object_key_and_array_index_stay_distinct() {
    let as_key = path!["items", "0"];
    let as_index = path!["items", 0];
    assert_ne!(as_key.to_string(), as_index.to_string());
    assert_eq!(parse_path(&as_key.to_string()).unwrap().segments()[1], Segment::Key("0".into()));
    assert_eq!(parse_path(&as_index.to_string()).unwrap().segments()[1], Segment::Index(0));
}

#[test]
fn path_serde_uses_canonical_text() {
    let p = path!["a", 1, "b c"];
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, r#""a[1][\"b c\"]""#);
    let back: Path = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);

    let bad: Result<Path, _> = serde_json::from_str(r#""a..b""#);
    assert!(bad.is_err());
}

#[test]
fn negative_index_is_rejected() {
    let err = parse_path("list[-1]").unwrap_err();
    assert_eq!(
        err,
        PathParseError::InvalidIndex { offset: 5, text: "-1".to_string() }
    );
}

#[test]
fn validated_parse_rejects_overly_deep_paths() {
    let text = "[0]".repeat(300);
    assert!(matches!(parse_validated(&text), Err(PathParseError::TooDeep { depth: 300 })));
}
