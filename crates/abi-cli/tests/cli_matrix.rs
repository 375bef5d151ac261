use abi_cli::{fmt, get, set, CliError, Output};

const DOC: &[u8] = br#"{"user": {"name": "ada", "ids": [5000000000, 7]}, "z": 1, "a": 2}"#;

fn run(out: Result<Vec<u8>, CliError>) -> String {
    String::from_utf8(out.expect("command succeeds")).expect("utf-8 output")
}

#[test]
fn get_matrix() {
    let out = Output::default();
    let cases = [
        ("user.name", "\"ada\"\n"),
        ("user.ids.@first", "5000000000\n"),
        ("user.ids.@length", "2\n"),
        ("user.ids.1", "7\n"),
        ("a", "2\n"),
    ];
    for (path, expected) in cases {
        assert_eq!(run(get(DOC, path, ".", &out)), expected, "{path}");
    }
    assert!(matches!(
        get(DOC, "user.ids.9", ".", &out),
        Err(CliError::NotFound(_))
    ));
}

#[test]
fn set_keeps_decoded_literals() {
    let out = Output::default();
    assert_eq!(
        run(set(b"{}", "n", "5000000000", ".", &out)),
        "{\"n\":5000000000}\n",
        "decoded literals are written back verbatim"
    );
    assert_eq!(
        run(set(b"null", "a/b", "{\"c\": [1]}", "/", &out)),
        "{\"a\":{\"b\":{\"c\":[1]}}}\n"
    );
}

#[test]
fn fmt_sorted_and_indented() {
    let sorted = Output {
        sorted: true,
        indent: None,
    };
    assert_eq!(
        run(fmt(DOC, &sorted)),
        "{\"a\":2,\"user\":{\"ids\":[5000000000,7],\"name\":\"ada\"},\"z\":1}\n"
    );
    let pretty = Output {
        sorted: false,
        indent: Some(1),
    };
    assert_eq!(run(fmt(br#"{"k":[]}"#, &pretty)), "{\n \"k\": []\n}\n");
}

#[test]
fn decode_errors_surface() {
    let out = Output::default();
    assert!(matches!(fmt(b"{\"a\" 1}", &out), Err(CliError::Decode(_))));
    assert!(matches!(
        set(b"{}", "a", "not json", ".", &out),
        Err(CliError::Decode(_))
    ));
}
