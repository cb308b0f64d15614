use super::*;

fn run(source: &str) -> (EvalResult<()>, String, HashMap<String, Token>) {
    let mut interpreter = Interpreter::new(Vec::new(), false);
    let result = interpreter.execute(source);
    let variables = interpreter.variables().clone();
    let output = String::from_utf8(interpreter.into_output()).unwrap();

    (result, output, variables)
}

fn output_of(source: &str) -> String {
    let (result, output, _) = run(source);

    if let Err(err) = result {
        panic!("Program failed: {}\n{}", err, source);
    }

    output
}

fn runtime_error(source: &str) -> RuntimeError {
    match run(source).0 {
        Err(InterpreterError::Runtime(err)) => err,
        Err(err) => panic!("Expected runtime error, got {}", err),
        Ok(()) => panic!("Expected runtime error for {:?}", source),
    }
}

fn evaluated(source: &str) -> Token {
    let (result, _, variables) = run(&format!("result = {}", source));

    if let Err(err) = result {
        panic!("Program failed: {}\n{}", err, source);
    }

    variables["result"].clone()
}

fn assert_evaluates(source: &str, expected: &str, token_type: TokenType) {
    let token = evaluated(source);
    assert_eq!((token.source(), token.token_type()), (expected, token_type), "in {:?}", source);
}

mod arithmetic {
    use super::*;

    #[test]
    pub fn test_precedence() {
        assert_evaluates("1 + 2 * 3", "7", TokenType::Integer);
        assert_evaluates("(1 + 2) * 3", "9", TokenType::Integer);
        assert_evaluates("2 ** 3 ** 2", "512", TokenType::Integer);
    }

    #[test]
    pub fn test_right_associativity() {
        assert_evaluates("10 - 4 - 3", "9", TokenType::Integer);
        assert_evaluates("8 / 4 / 2", "4.0", TokenType::Float);
    }

    #[test]
    pub fn test_mixed_numbers() {
        assert_evaluates("1 + 2.5", "3.5", TokenType::Float);
        assert_evaluates("2.0 * 3", "6.0", TokenType::Float);
        assert_evaluates("7 / 2", "3.5", TokenType::Float);
        assert_evaluates("4 / 2", "2.0", TokenType::Float);
        assert_evaluates("2 ** -1", "0.5", TokenType::Float);
        assert_evaluates("0.1 + 0.2", "0.30000000000000004", TokenType::Float);
    }

    #[test]
    pub fn test_division_by_zero() {
        assert_evaluates("1 / 0", "0.0", TokenType::Float);
        assert_evaluates("1 % 0", "0.0", TokenType::Float);
        assert_evaluates("2.5 / 0.0", "0.0", TokenType::Float);
    }

    #[test]
    pub fn test_floored_modulus() {
        assert_evaluates("7 % 3", "1", TokenType::Integer);
        assert_evaluates("-7 % 3", "2", TokenType::Integer);
        assert_evaluates("7 % -3", "-2", TokenType::Integer);
        assert_evaluates("7.5 % 2", "1.5", TokenType::Float);
        assert_evaluates("-1.5 % 2", "0.5", TokenType::Float);
    }

    #[test]
    pub fn test_negative_literals() {
        assert_evaluates("0 - 4", "-4", TokenType::Integer);
        assert_evaluates("3 * -2", "-6", TokenType::Integer);
    }

    #[test]
    pub fn test_glued_minus_starts_new_statement() {
        // `0-4` is the literal `0` followed by the literal `-4`
        let (result, _, variables) = run("x = 0-4");
        assert!(result.is_ok());
        assert_eq!(variables["x"].source(), "0");
    }

    #[test]
    pub fn test_unary_negation() {
        let (result, _, variables) = run("x = 5\ny = -x\nz = -f\n");
        assert!(matches!(result, Err(InterpreterError::Runtime(RuntimeError::UndefinedVariable { .. }))));
        assert_eq!(variables["x"].source(), "5");
        assert_eq!(variables["y"].source(), "-5");
    }

    #[test]
    pub fn test_arbitrary_precision() {
        assert_evaluates("9223372036854775807 + 1", "9223372036854775808", TokenType::Integer);
        assert_evaluates("-9223372036854775808 - 1", "-9223372036854775809", TokenType::Integer);
        assert_evaluates("2 ** 64", "18446744073709551616", TokenType::Integer);
        assert_evaluates("99999999999999999999 + 1", "100000000000000000000", TokenType::Integer);
        assert_evaluates("99999999999999999999 % 7", "1", TokenType::Integer);
        assert_evaluates("2 ** 64 > 2 ** 63", "true", TokenType::Boolean);
        assert_evaluates("(2 ** 64) / (2 ** 63)", "2.0", TokenType::Float);
        assert_eq!(output_of("x = 10 ** 30\nprint -x"), "-1000000000000000000000000000000\n");
    }

    #[test]
    pub fn test_comparisons() {
        assert_evaluates("1 < 2", "true", TokenType::Boolean);
        assert_evaluates("2 <= 1", "false", TokenType::Boolean);
        assert_evaluates("1 == 1.0", "true", TokenType::Boolean);
        assert_evaluates("3 != 3", "false", TokenType::Boolean);
        assert_evaluates("2.5 >= 2", "true", TokenType::Boolean);
        assert_evaluates("1 + 1 > 1", "true", TokenType::Boolean);
    }
}

mod booleans {
    use super::*;

    #[test]
    pub fn test_logic() {
        assert_evaluates("true and false", "false", TokenType::Boolean);
        assert_evaluates("true or false", "true", TokenType::Boolean);
        assert_evaluates("not true", "false", TokenType::Boolean);
        assert_evaluates("!false and true", "true", TokenType::Boolean);
        assert_evaluates("1 < 2 and 2 < 3", "true", TokenType::Boolean);
    }

    #[test]
    pub fn test_equality() {
        assert_evaluates("true == true", "true", TokenType::Boolean);
        assert_evaluates("false == false", "true", TokenType::Boolean);
        assert_evaluates("true != false", "true", TokenType::Boolean);
    }

    #[test]
    pub fn test_unsupported() {
        assert!(matches!(runtime_error("x = true + false"), RuntimeError::UnsupportedOperator { .. }));
        assert!(matches!(runtime_error("x = 1 and 2"), RuntimeError::UnsupportedOperator { .. }));
    }

    #[test]
    pub fn test_unary_of_other_kind_keeps_operand() {
        assert_evaluates("not 1", "1", TokenType::Integer);
        assert_evaluates("!2.5", "2.5", TokenType::Float);
        assert_eq!(output_of("print !5"), "5\n");
        assert_eq!(output_of("b = true\nprint -b"), "true\n");

        let (_, _, variables) = run("b = false\nx = -b");
        assert_eq!((variables["x"].source(), variables["x"].token_type()), ("false", TokenType::Boolean));
    }

    #[test]
    pub fn test_unary_of_unsupported_kind() {
        assert!(matches!(runtime_error("s = \"a\"\nx = -s"), RuntimeError::CannotApplyUnary { .. }));
        assert!(matches!(runtime_error("x = not \"a\""), RuntimeError::CannotApplyUnary { .. }));
        assert!(matches!(runtime_error("x = !None"), RuntimeError::CannotApplyUnary { .. }));
    }
}

mod strings {
    use super::*;

    #[test]
    pub fn test_concatenation() {
        assert_evaluates("\"a\" + \"b\"", "ab", TokenType::String);
        assert_evaluates("\"x = \" + \"(1)\"", "x = (1)", TokenType::String);
    }

    #[test]
    pub fn test_equality() {
        assert_evaluates("\"a\" == \"a\"", "true", TokenType::Boolean);
        assert_evaluates("\"a\" != \"a\"", "false", TokenType::Boolean);
    }

    #[test]
    pub fn test_unsupported() {
        assert!(matches!(runtime_error("x = \"a\" - \"b\""), RuntimeError::UnsupportedOperator { .. }));
        assert!(matches!(runtime_error("x = \"a\" < \"b\""), RuntimeError::UnsupportedOperator { .. }));
    }
}

mod types {
    use super::*;

    #[test]
    pub fn test_mismatch() {
        assert!(matches!(runtime_error("x = 1 + \"a\""), RuntimeError::TypeMismatch { .. }));
        assert!(matches!(runtime_error("x = true == 1"), RuntimeError::TypeMismatch { .. }));
        assert!(matches!(runtime_error("x = None == None"), RuntimeError::TypeMismatch { .. }));
        assert!(matches!(runtime_error("x = 1 + None"), RuntimeError::TypeMismatch { .. }));
    }

    #[test]
    pub fn test_none_literal() {
        assert_evaluates("None", "None", TokenType::NoneLiteral);
        assert_eq!(output_of("print None"), "None\n");
    }
}

mod variables {
    use super::*;

    #[test]
    pub fn test_assignment() {
        let (result, _, variables) = run("x = 1 + 2 * 3");
        assert!(result.is_ok());
        assert_eq!(variables["x"].source(), "7");
        assert_eq!(variables["x"].token_type(), TokenType::Integer);
    }

    #[test]
    pub fn test_assignment_resolves_variables() {
        let (_, output, variables) = run("x = 2\ny = x\nx = 3\nprint y");
        assert_eq!(output, "2\n");
        assert_eq!(variables["y"].source(), "2");
    }

    #[test]
    pub fn test_undefined_variable() {
        match runtime_error("x = y + 1") {
            RuntimeError::UndefinedVariable { name, usage } => {
                assert_eq!(name.source(), "y");
                assert_eq!(usage, Usage::Binary);
            },
            other => panic!("Expected undefined variable, got {}", other),
        }

        assert!(matches!(runtime_error("x = y"), RuntimeError::UndefinedVariable { usage: Usage::Assignment, .. }));
        assert!(matches!(runtime_error("x = !y"), RuntimeError::UndefinedVariable { usage: Usage::Unary, .. }));
    }

    #[test]
    pub fn test_mapping_reset_between_runs() {
        let mut interpreter = Interpreter::new(Vec::new(), false);
        interpreter.execute("x = 1").unwrap();
        assert!(interpreter.variables().contains_key("x"));

        assert!(interpreter.execute("print x").is_err());
        assert!(interpreter.variables().is_empty());
    }
}

mod keywords {
    use super::*;

    #[test]
    pub fn test_print() {
        assert_eq!(output_of("x = 4\nprint x\nprint x * 2\nprint \"done\"\nprint 1 < 2"), "4\n8\ndone\ntrue\n");
    }

    #[test]
    pub fn test_print_undefined() {
        let (result, output, _) = run("print x");
        assert!(matches!(result, Err(InterpreterError::Runtime(RuntimeError::UndefinedVariable { usage: Usage::Print, .. }))));
        assert_eq!(output, "");
    }

    #[test]
    pub fn test_error_stops_evaluation() {
        let (result, output, _) = run("print 1\nprint y\nprint 2");
        assert!(result.is_err());
        assert_eq!(output, "1\n");
    }

    #[test]
    pub fn test_delete() {
        let (result, output, variables) = run("x = 1\ny = 2\ndel x\nprint y");
        assert!(result.is_ok());
        assert_eq!(output, "2\n");
        assert!(!variables.contains_key("x"));
        assert!(variables.contains_key("y"));

        assert!(matches!(runtime_error("x = 1\ndel x\nprint x"), RuntimeError::UndefinedVariable { .. }));
    }

    #[test]
    pub fn test_delete_errors() {
        match runtime_error("del y") {
            RuntimeError::DeleteUndefined { name } => assert_eq!(name.source(), "y"),
            other => panic!("Expected deletion error, got {}", other),
        }

        match runtime_error("del 5") {
            RuntimeError::DeleteNonVariableToken { token } => assert_eq!(token.token_type(), TokenType::Integer),
            other => panic!("Expected deletion error, got {}", other),
        }

        assert!(matches!(runtime_error("x = 1\ndel x + 1"), RuntimeError::DeleteNonVariableNode { .. }));
        assert!(matches!(runtime_error("x = 1\ndel -x"), RuntimeError::DeleteNonVariableNode { .. }));
    }
}

mod debug_mode {
    use super::*;

    #[test]
    pub fn test_prints_tokens_and_tree() {
        let mut interpreter = Interpreter::new(Vec::new(), false).debug(true);
        interpreter.execute("print 1 + 2").unwrap();
        let output = String::from_utf8(interpreter.into_output()).unwrap();

        assert_eq!(output, "print 1 + 2\n\
                            [\"print\", \"1\", \"+\", \"2\", \"EOF\"]\n\
                            \"print\"\tReservedKeyword\n\
                            \"1\"\tInteger\n\
                            \"+\"\tBinaryOp\n\
                            \"2\"\tInteger\n\
                            \"EOF\"\tEndOfInput\n\
                            ['print', [['1'], '+', ['2']]]\n\
                            3\n");
    }
}

#[test]
pub fn test_execution_is_deterministic() {
    let source = "a = 3\nb = a * 2.5\nprint b\nprint \"a\" + \"b\"\nprint a >= b or true\n";

    let mut interpreter = Interpreter::new(Vec::new(), false);
    interpreter.execute_all(&[source, source]).unwrap();
    let output = String::from_utf8(interpreter.into_output()).unwrap();

    assert_eq!(output, "7.5\nab\ntrue\n7.5\nab\ntrue\n");
}

#[test]
pub fn test_error_categories() {
    let (result, _, _) = run("x = (1");
    assert!(result.unwrap_err().to_string().starts_with("Parser error: "));

    let (result, _, _) = run("print y");
    assert!(result.unwrap_err().to_string().starts_with("Interpreter error: "));
}
