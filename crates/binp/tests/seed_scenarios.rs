//! End-to-end runs of whole BinP programs, asserting on exact captured stdout.

use binp::{CollectStringPrint, Program};

fn run(source: &str, args: &[&str]) -> String {
    let program = Program::parse(source);
    let args: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
    let mut printer = CollectStringPrint::new();
    program.run(&args, &mut printer).expect("program should run to completion");
    printer.into_string()
}

#[test]
fn arithmetic_precedence() {
    let out = run("var int x = 2 + 3 * 4\noutput x", &[]);
    assert_eq!(out, " >> 14");
}

#[test]
fn recursive_factorial() {
    let source = "\
var int func fact = ( int n ) =>
if ( n <= 1 ) =>
return 1
else
return n * fact ( n - 1 )
end
end fact
output fact ( 5 )";
    assert_eq!(run(source, &[]), " >> 120");
}

#[test]
fn non_recursive_call() {
    let source = "\
var int func add = ( int a , int b ) =>
return a + b
end add
output add ( 10 , 32 )";
    assert_eq!(run(source, &[]), " >> 42");
}

#[test]
fn while_loop_counts_up() {
    let source = "var int i = 0\nwhile ( i < 3 ) =>\noutput i\nvar int i = i + 1\nend";
    assert_eq!(run(source, &[]), " >> 0\n >> 1\n >> 2");
}

#[test]
fn while_else_runs_once_on_loop_exit() {
    let source = "\
var int i = 0
while ( i < 2 ) =>
var int i = i + 1
else
output 'done'
end
output i";
    assert_eq!(run(source, &[]), " >> done\n >> 2");
}

#[test]
fn if_else_branches_on_condition() {
    let source = "var int n = 1\nif ( n == 1 ) =>\noutput 'yes'\nelse\noutput 'no'\nend";
    assert_eq!(run(source, &[]), " >> yes");
}

#[test]
fn assigning_an_unresolved_name_is_a_value_error() {
    let program = Program::parse("var int x = hello");
    let mut printer = CollectStringPrint::new();
    let err = program.run(&[], &mut printer).unwrap_err();
    assert!(err.to_string().contains("Value Error"));
}

#[test]
fn function_call_does_not_mutate_the_caller_namespace() {
    let source = "\
var int func bump = ( int n ) =>
var int n = n + 1
return n
end bump
var int x = 5
output bump ( x )
output x";
    assert_eq!(run(source, &[]), " >> 6\n >> 5");
}

#[test]
fn zero_parameter_function_call() {
    let source = "\
var int func answer = ( ) =>
return 42
end answer
output answer ( )";
    assert_eq!(run(source, &[]), " >> 42");
}

#[test]
fn a_later_argument_expression_sees_an_earlier_parameter_binding() {
    let source = "\
var int func chain = ( int a , int b ) =>
return b
end chain
output chain ( 5 , a + 1 )";
    assert_eq!(run(source, &[]), " >> 6");
}

#[test]
fn builtin_round_trips() {
    let source = "\
output bool_negate ( bool_negate ( true ) )
output int_negate ( int_negate ( 9 ) )";
    assert_eq!(run(source, &[]), " >> true\n >> 9");
}
