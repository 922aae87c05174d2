use serde_json::{json, Value};

pub enum Expected {
    Doc(Value),
    Error { index: usize, kind: &'static str },
}

pub struct Scenario {
    pub name: &'static str,
    pub doc: Value,
    pub patch: Value,
    pub expected: Expected,
}

fn ok(name: &'static str, doc: Value, patch: Value, expected: Value) -> Scenario {
    Scenario {
        name,
        doc,
        patch,
        expected: Expected::Doc(expected),
    }
}

fn err(name: &'static str, doc: Value, patch: Value, index: usize, kind: &'static str) -> Scenario {
    Scenario {
        name,
        doc,
        patch,
        expected: Expected::Error { index, kind },
    }
}

/// RFC 6902 appendix A, plus the failure modes of each operation.
pub fn rfc6902_scenarios() -> Vec<Scenario> {
    vec![
        ok(
            "A.1 adding an object member",
            json!({"foo": "bar"}),
            json!([{"op": "add", "path": "/baz", "value": "qux"}]),
            json!({"baz": "qux", "foo": "bar"}),
        ),
        ok(
            "A.2 adding an array element",
            json!({"foo": ["bar", "baz"]}),
            json!([{"op": "add", "path": "/foo/1", "value": "qux"}]),
            json!({"foo": ["bar", "qux", "baz"]}),
        ),
        ok(
            "A.3 removing an object member",
            json!({"baz": "qux", "foo": "bar"}),
            json!([{"op": "remove", "path": "/baz"}]),
            json!({"foo": "bar"}),
        ),
        ok(
            "A.4 removing an array element",
            json!({"foo": ["bar", "qux", "baz"]}),
            json!([{"op": "remove", "path": "/foo/1"}]),
            json!({"foo": ["bar", "baz"]}),
        ),
        ok(
            "A.5 replacing a value",
            json!({"baz": "qux", "foo": "bar"}),
            json!([{"op": "replace", "path": "/baz", "value": "boo"}]),
            json!({"baz": "boo", "foo": "bar"}),
        ),
        ok(
            "A.6 moving a value",
            json!({"foo": {"bar": "baz", "waldo": "fred"}, "qux": {"corge": "grault"}}),
            json!([{"op": "move", "from": "/foo/waldo", "path": "/qux/thud"}]),
            json!({"foo": {"bar": "baz"}, "qux": {"corge": "grault", "thud": "fred"}}),
        ),
        ok(
            "A.7 moving an array element",
            json!({"foo": ["all", "grass", "cows", "eat"]}),
            json!([{"op": "move", "from": "/foo/1", "path": "/foo/3"}]),
            json!({"foo": ["all", "cows", "eat", "grass"]}),
        ),
        ok(
            "A.8 testing a value: success",
            json!({"baz": "qux", "foo": ["a", 2, "c"]}),
            json!([
                {"op": "test", "path": "/baz", "value": "qux"},
                {"op": "test", "path": "/foo/1", "value": 2}
            ]),
            json!({"baz": "qux", "foo": ["a", 2, "c"]}),
        ),
        err(
            "A.9 testing a value: error",
            json!({"baz": "qux"}),
            json!([{"op": "test", "path": "/baz", "value": "bar"}]),
            0,
            "TestFailed",
        ),
        ok(
            "A.10 adding a nested member object",
            json!({"foo": "bar"}),
            json!([{"op": "add", "path": "/child", "value": {"grandchild": {}}}]),
            json!({"foo": "bar", "child": {"grandchild": {}}}),
        ),
        ok(
            "A.11 ignoring unrecognized elements",
            json!({"foo": "bar"}),
            json!([{"op": "add", "path": "/baz", "value": "qux", "xyz": 123}]),
            json!({"foo": "bar", "baz": "qux"}),
        ),
        err(
            "A.12 adding to a nonexistent target",
            json!({"foo": "bar"}),
            json!([{"op": "add", "path": "/baz/bat", "value": "qux"}]),
            0,
            "PathNotFound",
        ),
        ok(
            "A.14 ~ escape ordering",
            json!({"/": 9, "~1": 10}),
            json!([{"op": "test", "path": "/~01", "value": 10}]),
            json!({"/": 9, "~1": 10}),
        ),
        err(
            "A.15 comparing strings and numbers",
            json!({"/": 9, "~1": 10}),
            json!([{"op": "test", "path": "/~01", "value": "10"}]),
            0,
            "TestFailed",
        ),
        ok(
            "A.16 adding an array value",
            json!({"foo": ["bar"]}),
            json!([{"op": "add", "path": "/foo/-", "value": ["abc", "def"]}]),
            json!({"foo": ["bar", ["abc", "def"]]}),
        ),
        ok(
            "numeric token on an object is a key",
            json!({"0": "a"}),
            json!([{"op": "replace", "path": "/0", "value": "b"}]),
            json!({"0": "b"}),
        ),
        err(
            "empty token addresses nothing",
            json!({"": 1}),
            json!([{"op": "test", "path": "/", "value": 1}]),
            0,
            "PathNotFound",
        ),
        err(
            "add past the end of an array",
            json!({"foo": ["bar"]}),
            json!([{"op": "add", "path": "/foo/2", "value": "x"}]),
            0,
            "PathNotFound",
        ),
        err(
            "remove last element of an empty array",
            json!({"foo": []}),
            json!([{"op": "remove", "path": "/foo/-"}]),
            0,
            "PathNotFound",
        ),
        err(
            "remove the root",
            json!({"foo": 1}),
            json!([{"op": "remove", "path": ""}]),
            0,
            "InvalidPath",
        ),
        err(
            "move into own child",
            json!({"foo": {"bar": 1}}),
            json!([
                {"op": "test", "path": "/foo/bar", "value": 1},
                {"op": "move", "from": "/foo", "path": "/foo/bar/baz"}
            ]),
            1,
            "InvalidPath",
        ),
        err(
            "missing value",
            json!({}),
            json!([
                {"op": "add", "path": "/a", "value": 1},
                {"op": "replace", "path": "/a"}
            ]),
            1,
            "InvalidPayload",
        ),
        err(
            "unknown op",
            json!({}),
            json!([{"op": "increment", "path": "/a"}]),
            0,
            "InvalidPayload",
        ),
        err(
            "malformed pointer",
            json!({"a": 1}),
            json!([
                {"op": "remove", "path": "/a"},
                {"op": "add", "path": "/b~2", "value": 1}
            ]),
            1,
            "InvalidPointerSyntax",
        ),
        err(
            "failure after earlier success rolls back",
            json!({"a": [1, 2]}),
            json!([
                {"op": "add", "path": "/a/-", "value": 3},
                {"op": "remove", "path": "/a/0"},
                {"op": "copy", "from": "/nope", "path": "/b"}
            ]),
            2,
            "PathNotFound",
        ),
    ]
}
