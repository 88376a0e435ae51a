#[cfg(test)]
mod tests {
    use crate::machine::*;
    use crate::selection::MemorySelection;
    use crate::value::Value;
    use num_complex::Complex64;

    fn machine() -> Machine {
        Machine::new().with_selection(MemorySelection::new())
    }

    fn run(line: &str) -> Machine {
        let mut m = machine();
        m.eval_line(line).expect("eval failed");
        m
    }

    fn output(line: &str) -> Vec<String> {
        run(line).take_output()
    }

    #[test]
    fn push_numbers_and_strings() {
        let m = run("1 2.5 'x' \\y");
        assert_eq!(
            m.stack(),
            &[
                Value::Float(1.0),
                Value::Float(2.5),
                Value::str("x"),
                Value::str("y")
            ]
        );
    }

    #[test]
    fn add_pushes_result() {
        assert_eq!(run("3 4 +").stack(), &[Value::Float(7.0)]);
    }

    #[test]
    fn operands_keep_their_order() {
        assert_eq!(run("9 2 ^").stack(), &[Value::Float(81.0)]);
        assert_eq!(run("10 4 -").stack(), &[Value::Float(6.0)]);
        assert_eq!(run("1 2 /").stack(), &[Value::Float(0.5)]);
    }

    #[test]
    fn underflow_leaves_stack_untouched() {
        let mut m = machine();
        let err = m.eval_line("+").unwrap_err();
        assert!(matches!(err, MachineError::StackUnderflow { required: 2 }));
        assert!(m.stack().is_empty());

        let mut m = machine();
        let err = m.eval_line("1 +").unwrap_err();
        assert_eq!(err.to_string(), "Less than 2 element(s) on stack");
        assert_eq!(m.stack(), &[Value::Float(1.0)]);
    }

    #[test]
    fn error_aborts_rest_of_line() {
        let mut m = machine();
        assert!(m.eval_line("1 p + 2").is_err());
        assert_eq!(m.stack(), &[Value::Float(1.0)]);
        assert_eq!(m.take_output(), vec!["1.0"]);
    }

    #[test]
    fn lex_error_after_fed_lexemes() {
        let mut m = machine();
        let err = m.eval_line("1 2 'open").unwrap_err();
        assert_eq!(err.to_string(), "Couldn't lex 'open");
        assert_eq!(m.stack().len(), 2);
    }

    #[test]
    fn print_operators() {
        assert_eq!(output("3.5 p"), vec!["3.5"]);
        assert_eq!(output("1 2 3 f"), vec!["3.0", "2.0", "1.0"]);

        let mut m = run("1 2 P");
        assert_eq!(m.take_output(), vec!["2.0"]);
        assert_eq!(m.stack(), &[Value::Float(1.0)]);
    }

    #[test]
    fn print_on_empty_stack_fails() {
        let mut m = machine();
        assert!(matches!(
            m.eval_line("p"),
            Err(MachineError::StackUnderflow { required: 1 })
        ));
        assert!(m.eval_line("P").is_err());
        assert!(m.eval_line("d").is_err());
    }

    #[test]
    fn failed_pop_print_keeps_value() {
        let mut m = machine();
        m.eval_line("'abc'").unwrap();
        let err = m.eval_line("P").unwrap_err();
        assert!(matches!(err, MachineError::Conversion { .. }));
        assert_eq!(m.stack(), &[Value::str("abc")]);
    }

    #[test]
    fn dup_twice() {
        let mut m = run("7 1 d d");
        assert_eq!(m.stack().len(), 4);
        m.eval_line("P P").unwrap();
        assert_eq!(m.take_output(), vec!["1.0", "1.0"]);
        assert_eq!(m.stack(), &[Value::Float(7.0), Value::Float(1.0)]);
    }

    #[test]
    fn swap_and_rotate() {
        assert_eq!(run("1 2 r").stack(), &[Value::Float(2.0), Value::Float(1.0)]);
        assert!(machine().eval_line("1 r").is_err());

        let m = run("1 2 3 1 R");
        assert_eq!(
            m.stack(),
            &[Value::Float(3.0), Value::Float(1.0), Value::Float(2.0)]
        );
        let m = run("1 2 3 1 _ R");
        assert_eq!(
            m.stack(),
            &[Value::Float(2.0), Value::Float(3.0), Value::Float(1.0)]
        );
        assert!(run("5 R").stack().is_empty());
    }

    #[test]
    fn clear() {
        assert!(run("1 2 3 c").stack().is_empty());
    }

    #[test]
    fn apply_named_function() {
        assert_eq!(run("16 'sqrt' $").stack(), &[Value::Float(4.0)]);
        assert_eq!(run("2 3 'hypot' $ 'floor' $").stack(), &[Value::int(3)]);
        assert_eq!(run("'pi' $ 'pi' $ =").stack(), &[Value::Bool(true)]);
    }

    #[test]
    fn apply_unknown_name() {
        let mut m = machine();
        let err = m.eval_line("'nope' $").unwrap_err();
        assert!(matches!(err, MachineError::UnknownName(ref n) if n == "nope"));
    }

    #[test]
    fn apply_underflow_restores_name() {
        let mut m = machine();
        assert!(m.eval_line("'atan2' $").is_err());
        assert_eq!(m.stack(), &[Value::str("atan2")]);
    }

    #[test]
    fn math_failures_are_wrapped() {
        let mut m = machine();
        let err = m.eval_line("1 0 /").unwrap_err();
        assert_eq!(err.to_string(), "Cannot apply /");
        assert_eq!(err.render(true), "Cannot apply /: division by zero");

        let err = m.eval_line("4 _ 'sqrt' $").unwrap_err();
        assert_eq!(err.render(false), "Cannot apply sqrt");
    }

    #[test]
    fn complex_output_selects_complex_sqrt() {
        let mut m = machine();
        assert!(m.eval_line("4 _ v").is_err());

        let mut m = machine();
        m.eval_line("'c' o 4 _ v").unwrap();
        assert_eq!(m.stack(), &[Value::Complex(Complex64::new(0.0, 2.0))]);
        m.eval_line("p").unwrap();
        assert_eq!(m.take_output(), vec!["2j"]);
    }

    #[test]
    fn complex_operand_selects_complex_variant() {
        let m = run("2 j 'exp' $");
        assert!(m.stack()[0].is_complex());
        let m = run("1 j 2 ^");
        assert_eq!(m.stack().len(), 1);
        assert!(m.stack()[0].is_complex());
    }

    #[test]
    fn complex_only_functions() {
        let m = run("3 j 'phase' $");
        assert_eq!(m.stack(), &[Value::Float(std::f64::consts::FRAC_PI_2)]);
    }

    #[test]
    fn constant_register_written_once() {
        let mut m = machine();
        m.eval_line("5 'A' s").unwrap();
        let err = m.eval_line("6 'A' s").unwrap_err();
        assert!(matches!(err, MachineError::ConstantReassignment { .. }));
        assert_eq!(
            err.to_string(),
            "Attempting to assign 6.0 to constant register 'A'"
        );
        assert_eq!(m.stack(), &[Value::Float(6.0)]);
        m.eval_line("'A' l").unwrap();
        assert_eq!(m.stack(), &[Value::Float(6.0), Value::Float(5.0)]);
    }

    #[test]
    fn variable_register_overwrites() {
        let m = run("1 'x' s 2 'x' s 'x' l 'x' l");
        assert_eq!(m.stack(), &[Value::Float(2.0), Value::Float(2.0)]);
        assert_eq!(m.register("x"), Some(&Register::Variable(Value::Float(2.0))));
    }

    #[test]
    fn accumulator_register_pops() {
        let mut m = run("1 'Acc' s 2 'Acc' s 'Acc' l");
        assert_eq!(m.stack(), &[Value::Float(2.0)]);
        m.eval_line("'Acc' l").unwrap();
        assert_eq!(m.stack(), &[Value::Float(2.0), Value::Float(1.0)]);
        assert!(matches!(
            m.eval_line("'Acc' l"),
            Err(MachineError::UnknownRegister(_))
        ));
    }

    #[test]
    fn discard_register() {
        let m = run("1 '_' s '_' l");
        assert_eq!(m.stack(), &[Value::Nil]);
    }

    #[test]
    fn missing_register() {
        let mut m = machine();
        let err = m.eval_line("'q' l").unwrap_err();
        assert_eq!(err.to_string(), "No such register 'q'");
    }

    #[test]
    fn empty_name_is_invalid() {
        let mut m = machine();
        let err = m.eval_line("1 '' s").unwrap_err();
        assert_eq!(err.to_string(), "Name invalid name ''");
    }

    #[test]
    fn selection_registers() {
        let mut m = machine();
        m.eval_line("'hello' '+' s '+' l").unwrap();
        assert_eq!(m.stack(), &[Value::str("hello")]);
        assert!(matches!(
            m.eval_line("'*' l"),
            Err(MachineError::Selection(_))
        ));
    }

    #[test]
    fn name_shapes() {
        assert_eq!(name_shape("ABC"), NameShape::Constant);
        assert_eq!(name_shape("A1"), NameShape::Constant);
        assert_eq!(name_shape("abc"), NameShape::Variable);
        assert_eq!(name_shape("π"), NameShape::Variable);
        assert_eq!(name_shape("Abc"), NameShape::Accumulator);
        assert_eq!(name_shape("aBc"), NameShape::Accumulator);
        assert_eq!(name_shape("12"), NameShape::Accumulator);
        assert_eq!(name_shape("_"), NameShape::Discard);
        assert_eq!(name_shape("+"), NameShape::Selection("clipboard"));
    }

    #[test]
    fn input_format() {
        let m = run("'i' i 1_200");
        assert_eq!(m.stack(), &[Value::int(1200)]);

        let mut m = machine();
        m.eval_line("'i' i").unwrap();
        let err = m.eval_line("1.5").unwrap_err();
        assert_eq!(err.to_string(), "Cannot convert 1.5");
    }

    #[test]
    fn output_format() {
        assert_eq!(output("'i' o 7 2 / p"), vec!["3"]);
        assert_eq!(output("'F' o 0.75 p"), vec!["3/4"]);
        assert_eq!(output("'i' i 'D' o 12 p"), vec!["12"]);
        assert_eq!(output("'t' o 1.5 p"), vec!["01:30:00"]);
    }

    #[test]
    fn unknown_format() {
        let mut m = machine();
        let err = m.eval_line("'x' o").unwrap_err();
        assert!(matches!(err, MachineError::UnknownFormat(ref t) if t == "x"));
        assert_eq!(m.output_format(), Format::Float);
    }

    #[test]
    fn format_settings_round_trip() {
        let m = run("'D' i 'c' o I O K");
        assert_eq!(
            m.stack(),
            &[Value::str("D"), Value::str("c"), Value::Nil]
        );
        assert_eq!(m.input_format(), Format::Decimal);
    }

    #[test]
    fn precision_only_affects_printing() {
        let mut m = run("2 k 3.14159 p");
        assert_eq!(m.take_output(), vec!["3.14"]);
        assert_eq!(m.stack(), &[Value::Float(3.14159)]);
        assert_eq!(m.precision(), Some(2));

        m.eval_line("'_' l k p").unwrap();
        assert_eq!(m.take_output(), vec!["3.14159"]);
        assert_eq!(m.precision(), None);
    }

    #[test]
    fn bad_precision() {
        let mut m = machine();
        let err = m.eval_line("'many' k").unwrap_err();
        assert!(matches!(err, MachineError::BadPrecision(_)));
    }

    #[test]
    fn help_goes_to_diagnostics() {
        let mut m = run("h");
        assert!(m.take_output().is_empty());
        let lines = m.take_diagnostics();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("functions: "));
        assert!(lines[1].starts_with("operators: "));
        assert_eq!(lines[2], "formats: D F c d f i t");
    }

    #[test]
    fn verbose_help_lists_docs() {
        let lines = run("V").take_diagnostics();
        assert_eq!(lines[0], "functions:");
        assert!(lines.contains(&"sqrt: Return the square root of x.".to_string()));
        assert!(lines.contains(&"r: Swap two elements at top of stack.".to_string()));
        assert!(lines.contains(&"F: Fraction".to_string()));
    }

    #[test]
    fn help_for_name() {
        let lines = run("'r' H").take_diagnostics();
        assert_eq!(lines[0], "r: Swap two elements at top of stack.");
        let lines = run("'atan2' H").take_diagnostics();
        assert_eq!(lines[1], "takes 2 operand(s)");
        assert!(machine().eval_line("'zzz' H").is_err());
    }

    #[test]
    fn arity_of_lexemes() {
        let m = machine();
        let lexemes = crate::lexer::lex_all("1 + $ s").unwrap();
        let arities: Vec<Option<usize>> = lexemes.iter().map(|l| m.arity_of(l)).collect();
        assert_eq!(arities, vec![None, None, Some(2), None, Some(1), None, Some(2)]);
    }

    #[test]
    fn tuples_print_elementwise() {
        assert_eq!(output("8 'frexp' $ p"), vec!["(0.5, 4.0)"]);
        assert_eq!(output("'i' o 8 'frexp' $ p"), vec!["(0, 4)"]);
    }
}
