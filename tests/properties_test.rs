use english_lang::interpreter::prelude::{
    ErrorKind, ExecutionResult, Interpreter, InterpreterConfig, Value,
};
use english_lang::parser::prelude::InstructionParser;
use english_lang::traits::prelude::CoreOperations;
use pretty_assertions::assert_eq;

fn session() -> Interpreter {
    Interpreter::new(InterpreterConfig::default())
}

fn ok(it: &mut Interpreter, text: &str) -> ExecutionResult {
    let result = it.run_instruction(text);
    assert!(result.is_success(), "'{}' failed: {}", text, result);
    result
}

fn fails(it: &mut Interpreter, text: &str) -> ExecutionResult {
    let result = it.run_instruction(text);
    assert!(!result.is_success(), "'{}' unexpectedly succeeded", text);
    result
}

#[test]
fn created_variable_reads_back() {
    let mut it = session();
    ok(&mut it, "Create a variable named 'x' with value 5");
    assert_eq!(ok(&mut it, "Get x").data, Some(Value::Int(5)));
}

#[test]
fn arithmetic_and_division_by_zero() {
    let mut it = session();
    ok(&mut it, "Set a to 10");
    ok(&mut it, "Set b to 3");
    ok(&mut it, "Set c to a plus b");
    assert_eq!(it.variable("c"), Some(Value::Int(13)));

    let result = fails(&mut it, "Calculate a divided by 0");
    assert_eq!(result.kind, Some(ErrorKind::DivisionByZero));
    assert_eq!(result.message, "division by zero");
}

#[test]
fn range_loop_includes_both_ends() {
    let mut it = session();
    ok(&mut it, "Set sum to 0");
    ok(&mut it, "For i from 1 to 5, add i to sum");
    assert_eq!(it.variable("sum"), Some(Value::Int(15)));
}

#[test]
fn conditional_picks_a_branch() {
    let mut it = session();
    ok(&mut it, "Set x to 5");
    ok(&mut it, "If x greater than 3 set y to 1 otherwise set y to 0");
    assert_eq!(it.variable("y"), Some(Value::Int(1)));

    ok(&mut it, "Set x to 2");
    ok(&mut it, "If x greater than 3 set y to 1 otherwise set y to 0");
    assert_eq!(it.variable("y"), Some(Value::Int(0)));
}

#[test]
fn functions_check_arity() {
    let mut it = session();
    ok(
        &mut it,
        "Define a function named 'add' that takes 'a' and 'b' as parameters and returns 'a' plus 'b'",
    );
    ok(&mut it, "Set 'result' to the result of calling 'add' with 3 and 4");
    assert_eq!(it.variable("result"), Some(Value::Int(7)));

    let result = fails(&mut it, "Call function add with 3");
    assert_eq!(result.kind, Some(ErrorKind::ArityMismatch));
}

#[test]
fn stack_empties_in_reverse_order() {
    let mut it = session();
    ok(&mut it, "Create stack s");
    ok(&mut it, "Push 1 onto stack s");
    ok(&mut it, "Push 2 onto stack s");
    assert_eq!(ok(&mut it, "Pop from stack s").data, Some(Value::Int(2)));
    assert_eq!(ok(&mut it, "Pop from stack s").data, Some(Value::Int(1)));
    assert_eq!(fails(&mut it, "Pop from stack s").kind, Some(ErrorKind::EmptyContainer));
}

#[test]
fn interface_contract_is_checked_against_methods() {
    let mut it = session();
    ok(&mut it, "Create interface I with methods [m]");
    ok(&mut it, "Create class C");

    let result = fails(&mut it, "Implement I in C");
    assert_eq!(result.kind, Some(ErrorKind::ContractViolation));
    assert!(result.message.contains("'m'"), "{}", result.message);

    ok(&mut it, "Add method m to class C");
    ok(&mut it, "Implement I in C");
}

#[test]
fn redefinition_uses_the_latest_body() {
    let mut it = session();
    ok(&mut it, "Define function add with parameters a and b returns a plus b");
    ok(&mut it, "Define function add with parameters a and b returns a times b");
    ok(&mut it, "Call function add with 3 and 4 and store the result in r");
    assert_eq!(it.variable("r"), Some(Value::Int(12)));
}

#[test]
fn inherited_method_is_found_on_the_superclass() {
    let mut it = session();
    ok(&mut it, "Create class Animal");
    ok(&mut it, "Add method greet to class Animal returns \"hello\"");
    ok(&mut it, "Create class Dog that extends Animal");
    ok(&mut it, "Create object d of class Dog");
    ok(&mut it, "Set greeting to the result of calling method greet on d");
    assert_eq!(it.variable("greeting"), Some(Value::Str("hello".into())));
}

#[test]
fn nested_paths_create_intermediates() {
    let mut it = session();
    ok(&mut it, "Set config.server.port to 8080");
    ok(&mut it, "Set slots[2] to 'c'");

    assert_eq!(ok(&mut it, "Get config.server.port").data, Some(Value::Int(8080)));
    assert_eq!(
        it.variable("slots").map(|slots| slots.to_string()),
        Some("[null, null, 'c']".into())
    );
}

#[test]
fn bound_containers_are_shared() {
    let mut it = session();
    ok(&mut it, "Create list xs with [1]");
    ok(&mut it, "Set ys to the value of xs");
    ok(&mut it, "Append 2 to list ys");
    assert_eq!(ok(&mut it, "Get the length of list xs").data, Some(Value::Int(2)));
}

#[test]
fn unknown_names_report_their_kind() {
    let mut it = session();
    assert_eq!(fails(&mut it, "Get ghost").kind, Some(ErrorKind::UndefinedVariable));
    assert_eq!(fails(&mut it, "Call function ghost").kind, Some(ErrorKind::UndefinedFunction));
    assert_eq!(fails(&mut it, "Create object o of class Ghost").kind, Some(ErrorKind::ClassNotFound));
    assert_eq!(
        fails(&mut it, "Dequeue from queue nowhere").kind,
        Some(ErrorKind::ContainerNotFound)
    );
    assert_eq!(
        fails(&mut it, "Please do something clever").kind,
        Some(ErrorKind::UnrecognizedInstruction)
    );
}

#[test]
fn loops_nest_inside_conditionals() {
    let mut it = session();
    ok(&mut it, "Set flag to true");
    ok(&mut it, "Set total to 0");
    ok(&mut it, "If flag is true, for k from 1 to 3, add k to total");
    assert_eq!(it.variable("total"), Some(Value::Int(6)));
}

#[test]
fn results_render_as_json() {
    let mut it = session();
    let result = ok(&mut it, "Create list xs with [1, 'two']");
    assert_eq!(
        result.to_json(),
        serde_json::json!({
            "status": "success",
            "kind": null,
            "message": "created list 'xs' = [1, 'two']",
            "data": [1, "two"],
        })
    );

    let failure = fails(&mut it, "Get ghost");
    assert_eq!(failure.to_json()["kind"], "UndefinedVariable");
}

#[test]
fn list_appended_to_itself_still_renders() {
    let mut it = session();
    ok(&mut it, "Create list xs");
    let appended = ok(&mut it, "Append xs to list xs");
    assert_eq!(appended.message, "appended [[...]] to list 'xs'");
    assert_eq!(ok(&mut it, "Print the value of xs").message, "[[...]]");
    assert_eq!(appended.to_json()["data"], serde_json::json!(["[...]"]));

    ok(&mut it, "Create list ys");
    ok(&mut it, "Append ys to list ys");
    assert_eq!(it.variable("xs"), it.variable("ys"));
}

#[test]
fn far_indexes_are_rejected_instead_of_padded() {
    let mut it = session();
    assert_eq!(
        fails(&mut it, "Set xs[18446744073709551615] to 1").kind,
        Some(ErrorKind::IndexOutOfRange)
    );
    assert_eq!(
        fails(&mut it, "Set ys[50000] to 1").kind,
        Some(ErrorKind::IndexOutOfRange)
    );
    ok(&mut it, "Set zs[3] to 1");
    assert_eq!(
        it.variable("zs").map(|zs| zs.to_string()),
        Some("[null, null, null, 1]".into())
    );
}

#[test]
fn huge_string_repetition_fails() {
    let mut it = session();
    assert_eq!(
        fails(&mut it, "Calculate \"ab\" * 9223372036854775807").kind,
        Some(ErrorKind::TypeMismatch)
    );
    assert_eq!(
        ok(&mut it, "Calculate \"ab\" * 3").data,
        Some(Value::Str("ababab".into()))
    );
}

#[test]
fn bare_names_resolve_when_bound() {
    let mut it = session();
    ok(&mut it, "Set x to 5");
    ok(&mut it, "Set y to x");
    assert_eq!(it.variable("y"), Some(Value::Int(5)));

    ok(&mut it, "Set z to nothing");
    assert_eq!(it.variable("z"), Some(Value::Str("nothing".into())));
}

#[test]
fn rebinding_a_class_name_leaves_old_objects_alone() {
    let mut it = session();
    ok(&mut it, "Create class A");
    ok(&mut it, "Add method m to class A returns 1");
    ok(&mut it, "Create object o of class A");
    ok(&mut it, "Create class A");
    assert_eq!(ok(&mut it, "Call method m on o").data, Some(Value::Int(1)));
}

#[test]
fn parser_depth_limit_is_configurable() {
    let mut it = session().with_parser(InstructionParser::with_max_depth(1));
    ok(&mut it, "Set n to 0");
    ok(&mut it, "Repeat 2 times, set n to 1");
    assert_eq!(
        fails(&mut it, "Repeat 2 times, repeat 2 times, set n to 2").kind,
        Some(ErrorKind::InvalidSyntax)
    );
}
