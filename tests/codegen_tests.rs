// tests/codegen_tests.rs

mod common;

use common::{bare, compile, tokens};
use kettle_lang::{CompileError, CompileOptions, LowerError};

// ============================================================================
// Program wrapper and declarations
// ============================================================================

#[test]
fn test_wrapped_program() {
    let js = compile("x = 1", &CompileOptions::default());
    assert_eq!(js, "(function(){\n  var x;\n  x = 1;\n})();\n");
}

#[test]
fn test_bare_program() {
    assert_eq!(bare("x = 1"), "var x;\nx = 1;");
}

#[test]
fn test_globals_leave_names_undeclared() {
    let options = CompileOptions {
        no_wrap: true,
        globals: true,
        ..Default::default()
    };
    assert_eq!(compile("x = 1", &options), "x = 1;");
}

#[test]
fn test_request_return() {
    let options = CompileOptions {
        request_return: true,
        ..Default::default()
    };
    assert_eq!(
        compile("x = 1 ; x", &options),
        "(function(){\n  var x;\n  x = 1;\n  return x;\n})();\n"
    );
}

#[test]
fn test_declarations_are_sorted() {
    assert_eq!(bare("b = 1 ; a = 2"), "var a, b;\nb = 1;\na = 2;");
}

#[test]
fn test_compilation_is_repeatable() {
    let source = "FOR x IN list INDENT print( x ) OUTDENT ; y = a ?.b";
    assert_eq!(bare(source), bare(source));
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_word_operators() {
    assert_eq!(bare("a IS b"), "a === b;");
    assert_eq!(bare("a AND NOT b"), "a && !b;");
    assert_eq!(bare("TYPEOF x"), "typeof x;");
    assert_eq!(bare("x ++"), "x++;");
}

#[test]
fn test_chained_comparison() {
    assert_eq!(bare("a < b < c"), "(a < b) && (b < c);");
}

#[test]
fn test_chained_comparison_caches_middle() {
    assert_eq!(bare("a < f( ) < c"), "var _a;\n(a < (_a = f())) && (_a < c);");
}

#[test]
fn test_conditional_assignment() {
    assert_eq!(bare("a ||= b"), "var a;\na = a || b;");
}

#[test]
fn test_existence() {
    assert_eq!(bare("a ?"), "(typeof a !== \"undefined\" && a !== null);");
    assert_eq!(
        bare("a ? b"),
        "(typeof a !== \"undefined\" && a !== null) ? a : b;"
    );
}

#[test]
fn test_soak() {
    assert_eq!(bare("a ?.b"), "a == undefined ? undefined : a.b;");
}

#[test]
fn test_soak_caches_complex_base() {
    assert_eq!(bare("f( ) ?.b"), "var _a;\n(_a = f()) == undefined ? undefined : _a.b;");
}

#[test]
fn test_soak_chain_evaluates_base_once() {
    let js = bare("f( ) ?.a ?.b");
    assert_eq!(
        js,
        "var _a;\n(_a = f()) == undefined ? undefined : _a.a == undefined ? undefined : _a.a.b;"
    );
    assert_eq!(js.matches("f()").count(), 1);
}

#[test]
fn test_existence_operand_is_parenthesized() {
    assert_eq!(
        bare("x = a ? b + 1"),
        "var x;\nx = ((typeof a !== \"undefined\" && a !== null) ? a : b) + 1;"
    );
}

#[test]
fn test_ternary_operand_is_parenthesized() {
    assert_eq!(
        bare("x = 1 + IF a INDENT b OUTDENT ELSE INDENT c OUTDENT"),
        "var x;\nx = 1 + (a ? b : c);"
    );
}

#[test]
fn test_existence_assignment_evaluates_target_once() {
    let js = bare("a[ f( ) ] ?= 1");
    assert_eq!(
        js,
        "var _a, _b;\na[(_a = f())] = (typeof (_b = a[_a]) !== \"undefined\" && _b !== null) ? _b : 1;"
    );
    assert_eq!(js.matches("f()").count(), 1);
}

#[test]
fn test_conditional_assignment_caches_complex_base() {
    assert_eq!(
        bare("f( ) .x ||= 1"),
        "var _a;\n(_a = f()).x = _a.x || 1;"
    );
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn test_array_destructuring() {
    assert_eq!(
        bare("[ a , b ] = pair"),
        "var _a, a, b;\n_a = pair;\na = _a[0];\nb = _a[1];"
    );
}

#[test]
fn test_object_destructuring() {
    assert_eq!(
        bare("{ a , b : c } = obj"),
        "var _a, a, c;\n_a = obj;\na = _a.a;\nc = _a.b;"
    );
}

#[test]
fn test_slices() {
    assert_eq!(bare("list[ 1 .. 2 ]"), "list.slice(1, 2 + 1);");
    assert_eq!(bare("list[ 1 ... 2 ]"), "list.slice(1, 2);");
}

#[test]
fn test_splice_assignment() {
    assert_eq!(
        bare("list[ 1 .. 2 ] = other"),
        "list.splice.apply(list, [1, 2 - 1 + 1].concat(other));"
    );
}

#[test]
fn test_splice_assignment_evaluates_list_and_start_once() {
    let js = bare("f( )[ 1 .. 2 ] = v");
    assert_eq!(js, "var _a;\n(_a = f()).splice.apply(_a, [1, 2 - 1 + 1].concat(v));");
    assert_eq!(js.matches("f()").count(), 1);

    let js = bare("list[ g( ) .. 2 ] = v");
    assert_eq!(js, "var _a;\nlist.splice.apply(list, [(_a = g()), 2 - _a + 1].concat(v));");
    assert_eq!(js.matches("g()").count(), 1);
}

#[test]
fn test_range_literal() {
    let js = bare("x = [ 1 .. 3 ]");
    assert!(js.starts_with("var _a, _b, _c, _d, x;\nx = (function(){\n"));
    assert!(js.contains("_c.push(_d);"));
    assert!(js.ends_with("return _c;\n}).call(this);"));
}

#[test]
fn test_object_property_function_is_named() {
    assert_eq!(
        bare("obj = { double : PARAM_START n PARAM_END -> INDENT n * 2 OUTDENT }"),
        "var obj;\nobj = {\n  double: function double(n) {\n    return n * 2;\n  }\n};"
    );
}

// ============================================================================
// Functions and calls
// ============================================================================

#[test]
fn test_named_function() {
    assert_eq!(
        bare("square = PARAM_START x PARAM_END -> INDENT x * x OUTDENT"),
        "var square;\nsquare = function square(x) {\n  return x * x;\n};"
    );
}

#[test]
fn test_bound_function() {
    assert_eq!(
        bare("f = => INDENT THIS OUTDENT"),
        "var f;\nf = (function(__this) {\n  var __func = function() {\n    return this;\n  };\n  \
         return (function f() {\n    return __func.apply(__this, arguments);\n  });\n})(this);"
    );
}

#[test]
fn test_splat_parameter() {
    assert_eq!(
        bare("f = PARAM_START first , rest ... PARAM_END -> INDENT rest OUTDENT"),
        "var f;\nvar __slice = Array.prototype.slice;\nf = function f(first) {\n  var rest;\n  \
         rest = __slice.call(arguments, 1);\n  return rest;\n};"
    );
}

#[test]
fn test_splat_call() {
    assert_eq!(bare("f( a , rest ... )"), "f.apply(this, [a].concat(rest));");
    assert_eq!(bare("obj .method( args ... )"), "obj.method.apply(obj, args);");
}

#[test]
fn test_new_instance() {
    assert_eq!(bare("NEW Point( 1 , 2 )"), "new Point(1, 2);");
}

#[test]
fn test_new_instance_with_splat() {
    let js = bare("p = NEW Point( xs ... )");
    assert!(js.contains("__construct = function(func, args) {"));
    assert!(js.ends_with("\np = __construct(Point, xs);"));
    assert!(!js.contains("new Point.apply"));
}

#[test]
fn test_super_outside_method() {
    let err = kettle_lang::compile(&tokens("SUPER( )"), &CompileOptions::default()).unwrap_err();
    assert_eq!(err, CompileError::Lower(LowerError::SuperOutsideMethod));
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn test_class_without_parent() {
    assert_eq!(
        bare("CLASS Dog INDENT bark : -> INDENT \"woof\" OUTDENT OUTDENT"),
        "var Dog;\nDog = function Dog() {};\nDog.prototype.bark = function bark() {\n  return \"woof\";\n};"
    );
}

#[test]
fn test_super_chain() {
    let js = bare(
        "CLASS A INDENT speak : -> INDENT \"a\" OUTDENT OUTDENT ; \
         CLASS B EXTENDS A INDENT speak : -> INDENT SUPER( ) OUTDENT OUTDENT ; \
         CLASS C EXTENDS B INDENT speak : -> INDENT SUPER( ) OUTDENT OUTDENT",
    );

    assert!(js.contains("var A, B, C;"));
    assert!(js.contains("A = function A() {};"));
    assert!(js.contains("B = function B() {\n  return A.apply(this, arguments);\n};"));
    assert!(js.contains("__extends(C, B);"));
    assert!(js.contains("B.__superClass__.speak.call(this)"));
    assert!(js.contains("C.__superClass__.speak.call(this)"));
}

#[test]
fn test_extends() {
    let js = bare("Dog EXTENDS Animal");
    assert!(js.starts_with("var __extends = function(child, parent) {"));
    assert!(js.ends_with("__extends(Dog, Animal);"));
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_top_level_if() {
    assert_eq!(bare("IF a INDENT b OUTDENT"), "if (a) {\n  b;\n}");
}

#[test]
fn test_else_if_chain() {
    assert_eq!(
        bare("IF a INDENT b OUTDENT ELSE IF c INDENT d OUTDENT ELSE INDENT e OUTDENT"),
        "if (a) {\n  b;\n} else if (c) {\n  d;\n} else {\n  e;\n}"
    );
}

#[test]
fn test_if_as_value() {
    assert_eq!(
        bare("x = IF a INDENT b OUTDENT ELSE INDENT c OUTDENT"),
        "var x;\nx = a ? b : c;"
    );
    assert_eq!(bare("x = IF a INDENT b OUTDENT"), "var x;\nx = a ? b : null;");
}

#[test]
fn test_returns_pushed_into_branches() {
    assert_eq!(
        bare("f = -> INDENT IF a INDENT y = 1 ; b OUTDENT ELSE INDENT c OUTDENT OUTDENT"),
        "var f;\nf = function f() {\n  var y;\n  if (a) {\n    y = 1;\n    return b;\n  } else {\n    \
         return c;\n  }\n};"
    );
}

#[test]
fn test_switch() {
    assert_eq!(
        bare(
            "SWITCH x INDENT LEADING_WHEN 1 INDENT a OUTDENT \
             LEADING_WHEN 2 , 3 INDENT b OUTDENT ELSE INDENT c OUTDENT OUTDENT"
        ),
        "if (x === 1) {\n  a;\n} else if (x === 2 || x === 3) {\n  b;\n} else {\n  c;\n}"
    );
}

#[test]
fn test_switch_evaluates_subject_once() {
    assert_eq!(
        bare(
            "SWITCH f( ) INDENT LEADING_WHEN 1 INDENT a OUTDENT \
             LEADING_WHEN 2 INDENT b OUTDENT OUTDENT"
        ),
        "var _a;\nif ((_a = f()) === 1) {\n  a;\n} else if (_a === 2) {\n  b;\n}"
    );
}

// ============================================================================
// Loops
// ============================================================================

#[test]
fn test_while() {
    assert_eq!(bare("WHILE a INDENT b OUTDENT"), "while (a) {\n  b;\n}");
    assert_eq!(bare("UNTIL a INDENT b OUTDENT"), "while (!(a)) {\n  b;\n}");
    assert_eq!(bare("LOOP INDENT BREAK OUTDENT"), "while (true) {\n  break;\n}");
}

#[test]
fn test_array_loop() {
    assert_eq!(
        bare("FOR x IN list INDENT print( x ) OUTDENT"),
        "var _a, _b, _c, x;\n_a = list;\nfor (_b = 0, _c = _a.length; _b < _c; _b++) {\n  \
         x = _a[_b];\n  print(x);\n}"
    );
}

#[test]
fn test_range_loop() {
    assert_eq!(
        bare("FOR i IN [ 0 .. 3 ] INDENT print( i ) OUTDENT"),
        "var i;\nfor (i = 0; (0 <= 3 ? i <= 3 : i >= 3); (0 <= 3 ? i += 1 : i -= 1)) {\n  print(i);\n}"
    );
}

#[test]
fn test_object_loop() {
    assert_eq!(
        bare("FOR k , v OF obj INDENT print( k , v ) OUTDENT"),
        "var _a, k, v;\nvar __hasProp = Object.prototype.hasOwnProperty;\n_a = obj;\n\
         for (k in _a) { if (__hasProp.call(_a, k)) {\n  v = _a[k];\n  print(k, v);\n}}"
    );
}

#[test]
fn test_comprehension_value() {
    assert_eq!(
        bare("doubled = x * 2 FOR x IN list"),
        "var _a, _b, _c, _d, doubled, x;\ndoubled = (function() {\n  _a = []; _b = list;\n  \
         for (_c = 0, _d = _b.length; _c < _d; _c++) {\n    x = _b[_c];\n    _a.push(x * 2);\n  }\n  \
         return _a;\n}).call(this);"
    );
}

#[test]
fn test_loop_body_closure() {
    let js = bare("FOR x IN list INDENT fns .push( -> INDENT x OUTDENT ) OUTDENT");
    assert!(js.contains("}).call(this, _a[_b]);"));
    assert!(js.contains("function(x) {"));
}

// ============================================================================
// Exceptions and statement containment
// ============================================================================

#[test]
fn test_try_catch_finally() {
    assert_eq!(
        bare(
            "TRY INDENT risky( ) OUTDENT CATCH e INDENT recover( e ) OUTDENT \
             FINALLY INDENT done( ) OUTDENT"
        ),
        "try {\n  risky();\n} catch (e) {\n  recover(e);\n} finally {\n  done();\n}"
    );
}

#[test]
fn test_throw() {
    assert_eq!(bare("THROW err"), "throw err;");
}

#[test]
fn test_statement_in_expression_is_wrapped() {
    assert_eq!(
        bare("y = TRY INDENT a OUTDENT CATCH e INDENT b OUTDENT"),
        "var y;\ny = (function() {\n  try {\n    return a;\n  } catch (e) {\n    return b;\n  }\n}).call(this);"
    );
}

#[test]
fn test_return_inside_assigned_conditional() {
    let js = bare(
        "f = PARAM_START x PARAM_END -> INDENT \
         y = IF x INDENT RETURN 1 OUTDENT ELSE INDENT 2 OUTDENT OUTDENT",
    );
    assert_eq!(
        js,
        "var f;\nf = function f(x) {\n  if (x) {\n    return 1;\n  } else {\n    return 2;\n  }\n};"
    );
    assert!(!js.contains(".call(this)"));
}

#[test]
fn test_break_inside_assigned_loop() {
    let js = bare(
        "f = -> INDENT y = WHILE a INDENT IF b INDENT BREAK OUTDENT ; c OUTDENT OUTDENT",
    );
    assert!(!js.contains(".call(this)"));
    assert!(js.contains("      break;\n"));
    assert!(js.contains("_a.push(c);"));
    assert!(js.contains("return _a;"));
}

#[test]
fn test_only_last_line_of_returned_block_returns() {
    let js = bare(
        "f = -> INDENT RETURN TRY INDENT WHILE a INDENT b OUTDENT ; c OUTDENT \
         CATCH e INDENT d OUTDENT OUTDENT",
    );
    assert_eq!(
        js,
        "var f;\nf = function f() {\n  try {\n    while (a) {\n      b;\n    }\n    return c;\n  } \
         catch (e) {\n    return d;\n  }\n};"
    );
    assert!(!js.contains("_a"));
}
