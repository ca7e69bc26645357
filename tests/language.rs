use std::{
    cell::RefCell,
    fs,
    io::{self, Write},
    rc::Rc,
};

use flax::{
    error::{FlaxError, RuntimeError},
    interpreter::{
        Config, Context,
        value::{core::Value, environment::Environment},
    },
    parse, run_with_config, run_with_output,
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

/// A writer whose contents stay readable after it is handed to a context.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A writer that rejects every write.
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn run_capturing(src: &str) -> (String, Result<(), FlaxError>) {
    let buffer = SharedBuffer::default();
    let result = run_with_output(src, Box::new(buffer.clone()));
    (buffer.contents(), result)
}

fn output_of(src: &str) -> String {
    match run_capturing(src) {
        (output, Ok(())) => output,
        (_, Err(e)) => panic!("Script failed: {e}"),
    }
}

fn lines_of(src: &str) -> Vec<String> {
    output_of(src).lines().map(str::to_string).collect()
}

fn assert_success(src: &str) {
    if let (_, Err(e)) = run_capturing(src) {
        panic!("Script failed: {e}");
    }
}

fn failure_of(src: &str) -> FlaxError {
    match run_capturing(src) {
        (_, Ok(())) => panic!("Script succeeded but was expected to fail"),
        (_, Err(e)) => e,
    }
}

const FIBONACCI: &str = "
func fib(n) {
    if n < 2 { return n; }
    return fib(n - 1) + fib(n - 2);
}

func fibTwo(n) {
    if n < 2 { return n; }
    let prev = 0;
    let current = 1;
    let cur = 2;
    while cur <= n {
        let next = prev + current;
        prev = current;
        current = next;
        cur += 1;
    }
    return current;
}
";

fn reference_fib(n: u32) -> u64 {
    let (mut a, mut b) = (0_u64, 1_u64);
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    a
}

#[test]
fn scripts_run() {
    let mut count = 0;

    for entry in
        WalkDir::new("scripts").into_iter()
                               .filter_map(Result::ok)
                               .filter(|e| e.path().extension().is_some_and(|ext| ext == "flax"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        if let (_, Err(e)) = run_capturing(&content) {
            panic!("Script {path:?} failed:\n{e}");
        }
    }

    assert!(count > 0, "No scripts found in scripts/");
}

#[test]
fn fibonacci_script_output() {
    let script = fs::read_to_string("scripts/fibonacci.flax").expect("missing file");
    let output = output_of(&script);
    let lines: Vec<&str> = output.lines().collect();

    let expected: Vec<String> =
        (0..=20).map(|n| {
                    let f = reference_fib(n);
                    format!("fib({n}) = {f}, fibTwo({n}) = {f}")
                })
                .collect();

    assert_eq!(lines.len(), 22);
    assert_eq!(lines[..21].to_vec(), expected);
    assert!(lines[21].starts_with("elapsed: "));
    assert!(lines[21].ends_with('s'));
}

#[test]
fn closures_script_output() {
    let script = fs::read_to_string("scripts/closures.flax").expect("missing file");

    assert_eq!(lines_of(&script),
               vec!["ones: 3",
                    "tens: 20",
                    "show from shadow: global",
                    "innermost depth: 2",
                    "outer depth: 0",
                    "negative zero hundreds positive"]);
}

#[test]
fn fibonacci_concrete_values() {
    let src = format!("{FIBONACCI}
        println(fib(0)); println(fib(1)); println(fib(10));
        println(fibTwo(0)); println(fibTwo(1)); println(fibTwo(10));");

    assert_eq!(lines_of(&src), vec!["0", "1", "55", "0", "1", "55"]);
}

#[test]
fn recursive_and_iterative_fibonacci_agree() {
    let src = format!("{FIBONACCI}
        let n = 0;
        while n <= 24 {{
            if fib(n) != fibTwo(n) {{ println(\"mismatch at \" ++ n); }}
            n += 1;
        }}
        while n <= 30 {{
            println(fibTwo(n));
            n += 1;
        }}");

    let expected: Vec<String> = (25..=30).map(|n| reference_fib(n).to_string()).collect();
    assert_eq!(lines_of(&src), expected);
}

#[test]
fn recursive_fibonacci_of_thirty() {
    let src = format!("{FIBONACCI} println(fib(30) == fibTwo(30)); println(fib(30));");

    assert_eq!(lines_of(&src), vec!["true", "832040"]);
}

#[test]
fn block_local_let_is_not_visible_after_block() {
    let err = failure_of("{ let inner = 1; } println(inner);");
    assert_eq!(err.kind(), "UndefinedVariable");
    assert!(err.to_string().contains("'inner'"));

    assert_eq!(lines_of("let x = 1; { let x = 2; println(x); } println(x);"),
               vec!["2", "1"]);
}

#[test]
fn blocks_can_assign_outer_variables() {
    assert_eq!(output_of("let x = 1; { x = 2; } println(x);"), "2\n");
}

#[test]
fn returned_closure_observes_outer_locals() {
    let src = "
        func makeCounter() {
            let count = 0;
            func inc() {
                count += 1;
                return count;
            }
            return inc;
        }
        let c = makeCounter();
        c();
        c();
        println(c());
        let d = makeCounter();
        println(d());
        println(c());
    ";

    assert_eq!(lines_of(src), vec!["3", "1", "4"]);
}

#[test]
fn closures_share_captured_environment() {
    let src = "
        func pair() {
            let value = 0;
            func set(v) { value = v; }
            func get() { return value; }
            set(41);
            return get;
        }
        println(pair()());
    ";

    assert_eq!(output_of(src), "41\n");
}

#[test]
fn functions_resolve_names_in_defining_scope() {
    let src = "
        let x = \"global\";
        func show() { return x; }
        func caller() {
            let x = \"local\";
            return show();
        }
        println(caller());
    ";

    assert_eq!(output_of(src), "global\n");
}

#[test]
fn while_increments_once_per_iteration() {
    let src = "
        let cur = 0;
        let steps = 0;
        while cur <= 5 {
            cur += 1;
            steps += 1;
        }
        println(cur ++ \" \" ++ steps);
    ";

    assert_eq!(output_of(src), "6 6\n");
}

#[test]
fn while_with_false_condition_never_runs() {
    assert_eq!(output_of("while false { println(\"never\"); } println(\"done\");"),
               "done\n");
}

#[test]
fn concatenation_accepts_any_kind() {
    let src = "
        func f() {}
        println(1 ++ \"s\");
        println(\"a\" ++ \"b\");
        println(nil ++ true);
        println(0.5 ++ \"\");
        println(\"\" ++ f);
        println(println ++ \"\");
        println(\"n = \" ++ 1 + 2);
    ";

    assert_eq!(lines_of(src),
               vec!["1s", "ab", "niltrue", "0.5", "<func f>", "<native println>", "n = 3"]);
}

#[test]
fn numbers_print_in_shortest_form() {
    let src = "println(55); println(10 / 4); println(-3); println(1 / 0); println(0.1 + 0.2); \
               println(2.50);";

    assert_eq!(lines_of(src),
               vec!["55", "2.5", "-3", "inf", "0.30000000000000004", "2.5"]);
}

#[test]
fn clock_is_non_decreasing() {
    assert_eq!(output_of("let a = clock(); let b = clock(); println(b >= a); println(a >= 0);"),
               "true\ntrue\n");
}

#[test]
fn undeclared_identifier_is_undefined_variable() {
    let err = failure_of("let x = 1;\nprintln(foo);");

    assert!(matches!(&err,
                     FlaxError::Runtime(RuntimeError::UndefinedVariable { name, line: 2 })
                         if name == "foo"));
    assert_eq!(err.to_string(), "UndefinedVariable: Undefined variable 'foo' (line 2)");
    assert_eq!(err.exit_code(), 70);
}

#[test]
fn assignment_requires_declaration() {
    let err = failure_of("y = 1;");
    assert_eq!(err.kind(), "UndefinedVariable");
}

#[test]
fn wrong_arity_fails_before_body_runs() {
    let (output, result) = run_capturing("func f(a, b) { println(\"body\"); }\nf(1);");

    assert_eq!(output, "");
    assert!(matches!(result,
                     Err(FlaxError::Runtime(RuntimeError::ArityMismatch { expected: 2,
                                                                          found: 1,
                                                                          line: 2 }))));

    let err = failure_of("println();");
    assert_eq!(err.kind(), "ArityMismatch");
}

#[test]
fn calling_a_non_function_is_not_callable() {
    let err = failure_of("let x = 1; x();");
    assert_eq!(err.kind(), "NotCallable");
    assert!(err.to_string().contains("number"));
}

#[test]
fn arguments_are_evaluated_left_to_right() {
    let src = "
        func note(v) { println(v); return v; }
        func add(a, b) { return a + b; }
        println(add(note(1), note(2)));
    ";

    assert_eq!(lines_of(src), vec!["1", "2", "3"]);
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(lines_of("println(false && undefinedName); println(true || undefinedName);"),
               vec!["false", "true"]);
    assert_eq!(lines_of("println(true && false); println(false || true);"),
               vec!["false", "true"]);
}

#[test]
fn logical_operators_require_booleans() {
    assert_eq!(failure_of("1 && true;").kind(), "TypeMismatch");
    assert_eq!(failure_of("true && 1;").kind(), "TypeMismatch");
    assert_eq!(failure_of("false || nil;").kind(), "TypeMismatch");
}

#[test]
fn conditions_require_booleans() {
    assert_eq!(failure_of("if 1 { }").kind(), "TypeMismatch");
    assert_eq!(failure_of("while nil { }").kind(), "TypeMismatch");
    assert_eq!(failure_of("let x = 0 ? 1 : 2;").kind(), "TypeMismatch");
    assert_eq!(failure_of("!0;").kind(), "TypeMismatch");
}

#[test]
fn arithmetic_and_ordering_require_numbers() {
    assert_eq!(failure_of("1 + \"a\";").kind(), "TypeMismatch");
    assert_eq!(failure_of("-\"a\";").kind(), "TypeMismatch");
    assert_eq!(failure_of("1 < \"2\";").kind(), "TypeMismatch");
    assert_eq!(failure_of("\"a\" < \"b\";").kind(), "TypeMismatch");
    assert_eq!(failure_of("nil * 2;").kind(), "TypeMismatch");
}

#[test]
fn equality_is_total() {
    let src = "
        func f() {}
        let g = f;
        func h() {}
        println(1 == 1);
        println(\"a\" == \"a\");
        println(nil == nil);
        println(nil == false);
        println(1 == \"1\");
        println(f == g);
        println(f == h);
        println(clock == clock);
        println(1 != 2);
    ";

    assert_eq!(lines_of(src),
               vec!["true", "true", "true", "false", "false", "true", "false", "true", "true"]);
}

#[test]
fn compound_assignment() {
    assert_eq!(output_of("let x = 10; x -= 3; x *= 2; x /= 7; x += 0.5; println(x);"),
               "2.5\n");
}

#[test]
fn assignment_is_right_associative_and_yields_value() {
    assert_eq!(output_of("let a; let b; a = b = 3; println(a ++ b); println(a = 4);"),
               "33\n4\n");
}

#[test]
fn let_without_initializer_is_nil_and_redeclaration_replaces() {
    assert_eq!(lines_of("let a; println(a); let a = 2; println(a);"),
               vec!["nil", "2"]);
}

#[test]
fn conditional_expression_evaluates_one_branch() {
    let src = "
        println(true ? \"yes\" : undefinedName);
        println(false ? undefinedName : \"no\");
        println(1 > 2 ? \"a\" : 2 > 1 ? \"b\" : \"c\");
    ";

    assert_eq!(lines_of(src), vec!["yes", "no", "b"]);
}

#[test]
fn if_else_chains() {
    let src = "
        func grade(n) {
            if n >= 90 {
                return \"A\";
            } else if n >= 80 {
                return \"B\";
            } else {
                return \"C\";
            }
        }
        println(grade(95) ++ grade(85) ++ grade(10));
    ";

    assert_eq!(output_of(src), "ABC\n");
}

#[test]
fn return_unwinds_nested_blocks_and_loops() {
    let src = "
        func find() {
            let i = 0;
            while true {
                {
                    if i == 3 { return i; }
                }
                i += 1;
            }
        }
        println(find());
    ";

    assert_eq!(output_of(src), "3\n");
}

#[test]
fn function_without_return_yields_nil() {
    assert_eq!(output_of("func f() { let x = 1; } println(f());"), "nil\n");
    assert_eq!(output_of("func f() { return; } println(f());"), "nil\n");
}

#[test]
fn top_level_return_ends_program() {
    assert_eq!(output_of("println(1); return; println(2);"), "1\n");
}

#[test]
fn mutual_recursion_through_globals() {
    let src = "
        func isEven(n) { return n == 0 ? true : isOdd(n - 1); }
        func isOdd(n) { return n == 0 ? false : isEven(n - 1); }
        println(isEven(10));
        println(isOdd(7));
    ";

    assert_eq!(lines_of(src), vec!["true", "true"]);
}

#[test]
fn deep_recursion_within_limit_succeeds() {
    let src = "func down(n) { if n == 0 { return 0; } return down(n - 1); } println(down(5000));";
    assert_eq!(output_of(src), "0\n");
}

#[test]
fn recursion_beyond_limit_is_stack_overflow() {
    let err = failure_of("func forever(n) { return forever(n + 1); }\nforever(0);");
    assert!(matches!(err,
                     FlaxError::Runtime(RuntimeError::StackOverflow { depth: 10_000, .. })));

    let config = Config { max_call_depth: 50 };
    let src = "func down(n) { if n == 0 { return 0; } return down(n - 1); }";
    assert!(run_with_config(&format!("{src} down(49);"), config, Box::new(io::sink())).is_ok());
    let err = run_with_config(&format!("{src} down(50);"), config, Box::new(io::sink())).unwrap_err();
    assert_eq!(err.kind(), "StackOverflow");
}

#[test]
fn cyclic_closures_are_reclaimed() {
    let src = "
        func make() {
            let x = 1;
            func inner() { return x; }
            return inner;
        }
        let i = 0;
        while i < 100 {
            make();
            i += 1;
        }
    ";
    let program = parse(src).expect("parses");
    let mut ctx = Context::with_output(Config::default(), Box::new(io::sink()));
    ctx.run(&program).expect("runs");

    // Each call scope holds a closure that captures it.
    assert_eq!(ctx.live_environments(), 101);
    assert_eq!(ctx.collect_garbage(), 100);
    assert_eq!(ctx.live_environments(), 1);
}

#[test]
fn reclamation_keeps_reachable_closures() {
    let src = "
        func make() {
            func inner() { return inner; }
            return inner;
        }
        let kept = make();
        let i = 0;
        while i < 5000 {
            make();
            i += 1;
        }
        println(kept() == kept);
    ";
    let program = parse(src).expect("parses");
    let buffer = SharedBuffer::default();
    let mut ctx = Context::with_output(Config::default(), Box::new(buffer.clone()));
    ctx.run(&program).expect("runs");

    assert_eq!(buffer.contents(), "true\n");
    assert!(ctx.live_environments() < 2000);
    ctx.collect_garbage();
    // The global scope and the one scope still reachable through `kept`.
    assert_eq!(ctx.live_environments(), 2);
}

#[test]
fn reclamation_runs_inside_calls() {
    let src = "
        func adder(n) {
            func add(x) { return n + x; }
            return add;
        }
        func cycle() {
            func me() { return me; }
        }
        func churn() {
            let i = 0;
            while i < 3000 {
                cycle();
                i += 1;
            }
            return 1;
        }
        func apply(f, x) { return f(x); }
        func main() {
            println(adder(40)(churn()));
            println(apply(adder(1), churn()));
            println(churn() + adder(2)(churn()));
        }
        main();
    ";
    let program = parse(src).expect("parses");
    let buffer = SharedBuffer::default();
    let mut ctx = Context::with_output(Config::default(), Box::new(buffer.clone()));
    ctx.run(&program).expect("runs");

    // Each `add` closure was only held as a pending operand while `churn`
    // forced collections.
    assert_eq!(buffer.contents(), "41\n2\n4\n");
    assert!(ctx.live_environments() < 2000);
    ctx.collect_garbage();
    assert_eq!(ctx.live_environments(), 1);
}

#[test]
fn lookup_walks_the_scope_chain() {
    let program = parse("let x = 1; func f() { }").expect("parses");
    let mut ctx = Context::with_output(Config::default(), Box::new(io::sink()));
    ctx.run(&program).expect("runs");

    assert_eq!(ctx.lookup("x"), Some(Value::Number(1.0)));
    assert!(ctx.lookup("f").is_some_and(|f| f.is_callable()));
    assert_eq!(ctx.lookup("missing"), None);

    let mut scope = Rc::clone(ctx.globals());
    for depth in 0..10_000 {
        let inner = Environment::with_enclosing(Rc::clone(&scope));
        scope = Rc::new(RefCell::new(inner));
        scope.borrow_mut().define("depth", Value::Number(f64::from(depth)));
    }
    let scope = scope.borrow();
    assert_eq!(scope.lookup("x"), Some(Value::Number(1.0)));
    assert_eq!(scope.lookup("depth"), Some(Value::Number(9999.0)));
    assert_eq!(scope.get("missing", 3),
               Err(RuntimeError::UndefinedVariable { name: "missing".to_string(),
                                                     line: 3, }));
}

#[test]
fn deeply_nested_programs_run() {
    let depth = 10_000;

    let parens = format!("println({}1{});", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(output_of(&parens), "1\n");

    let negations = format!("println({}true);", "!".repeat(depth + 1));
    assert_eq!(output_of(&negations), "false\n");

    let blocks = format!("{}println(2);{}", "{".repeat(depth), "}".repeat(depth));
    assert_eq!(output_of(&blocks), "2\n");

    let mut chain = String::from("let n = -1;\n");
    for i in 0..depth {
        chain.push_str(&format!("if n == {i} {{ }} else "));
    }
    chain.push_str("{ println(\"last\"); }");
    assert_eq!(output_of(&chain), "last\n");
}

#[test]
fn long_operator_chains_run() {
    let sum = format!("println(1{});", " + 1".repeat(50_000));
    assert_eq!(output_of(&sum), "50001\n");

    let text = format!("println(\"\"{});", " ++ \"a\"".repeat(10_000));
    assert_eq!(output_of(&text), format!("{}\n", "a".repeat(10_000)));
}

#[test]
fn malformed_program_produces_no_output() {
    let (output, result) = run_capturing("println(\"hi\");\nlet = 3;");

    assert_eq!(output, "");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), "ParseError");
    assert_eq!(err.line(), 2);
    assert_eq!(err.exit_code(), 65);
}

#[test]
fn lexical_errors() {
    let err = failure_of("println(\"hi\");\nlet s = \"open;");
    assert_eq!(err.to_string(), "LexError: Unterminated string literal (line 2)");
    assert_eq!(err.exit_code(), 65);

    let err = failure_of("let x = 1 @ 2;");
    assert_eq!(err.kind(), "LexError");
    assert_eq!(err.line(), 1);

    assert_eq!(failure_of("let s = \"\\q\";").kind(), "LexError");
}

#[test]
fn string_escapes_and_multiline_strings() {
    assert_eq!(output_of("println(\"a\\tb\\\"c\\\\\");"), "a\tb\"c\\\n");

    let err = failure_of("let s = \"first\nsecond\";\nprintln(s);\nprintln(missing);");
    assert_eq!(err.line(), 4);
}

#[test]
fn comments_are_ignored() {
    assert_eq!(output_of("// leading\nprintln(1); // trailing\n// println(2);"), "1\n");
}

#[test]
fn broken_output_is_an_io_error() {
    let err = run_with_output("let x = 1;\nprintln(x);", Box::new(BrokenPipe)).unwrap_err();

    assert_eq!(err.kind(), "IoError");
    assert_eq!(err.line(), 2);
}

#[test]
fn programs_without_output_succeed() {
    assert_success("");
    assert_success("// only a comment");
    assert_success("let x = 1; func f(a) { return a; } f(x);");
}
