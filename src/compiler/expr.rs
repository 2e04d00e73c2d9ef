use inkwell::{
    types::BasicTypeEnum,
    values::BasicValueEnum,
    FloatPredicate, IntPredicate,
};

use crate::ast::{
    ast::{Node, NodeKind},
    types::{BinOp, Literal, UnOp},
};

use super::compiler::Compiler;

/// Generates LLVM IR for the given expression at the current insertion
/// point and returns the resulting value.
pub fn gen_expression<'a>(compiler: &Compiler<'a>, expression: &Node) -> BasicValueEnum<'a> {
    match &expression.kind {
        NodeKind::Literal(literal) => match literal {
            Literal::Int(value) => compiler
                .context
                .i32_type()
                .const_int(*value as u64, false)
                .into(),
            Literal::Float(value) => compiler
                .context
                .f32_type()
                .const_float(*value as f64)
                .into(),
            Literal::Bool(value) => compiler
                .context
                .bool_type()
                .const_int(*value as u64, false)
                .into(),
            Literal::Char(value) => compiler
                .context
                .i8_type()
                .const_int(*value as u64, false)
                .into(),
            Literal::Str(value) => compiler
                .builder
                .build_global_string_ptr(value, "")
                .unwrap()
                .as_pointer_value()
                .into(),
        },

        NodeKind::Identifier { name } => {
            // Missing slots mean an analysis/lowering bug, not a user error
            let alloca = compiler
                .named_allocas
                .get(name)
                .unwrap_or_else(|| panic!("variable {:?} has no storage slot", name));

            compiler.builder.build_load(*alloca, name).unwrap()
        }

        NodeKind::Binary { op, left, right } => {
            let left_val = gen_expression(compiler, left);
            let right_val = gen_expression(compiler, right);

            if left_val.get_type() != right_val.get_type() {
                panic!(
                    "operand types diverge in lowered binary expression: {:?} vs {:?}",
                    left_val.get_type(),
                    right_val.get_type()
                );
            }

            match left_val.get_type() {
                BasicTypeEnum::IntType(_) => {
                    let l = left_val.into_int_value();
                    let r = right_val.into_int_value();
                    match op {
                        BinOp::Add => compiler.builder.build_int_add(l, r, "").unwrap().into(),
                        BinOp::Sub => compiler.builder.build_int_sub(l, r, "").unwrap().into(),
                        BinOp::Mul => compiler.builder.build_int_mul(l, r, "").unwrap().into(),
                        BinOp::Div => compiler
                            .builder
                            .build_int_signed_div(l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Eq => compiler
                            .builder
                            .build_int_compare(IntPredicate::EQ, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Neq => compiler
                            .builder
                            .build_int_compare(IntPredicate::NE, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Lt => compiler
                            .builder
                            .build_int_compare(IntPredicate::SLT, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Gt => compiler
                            .builder
                            .build_int_compare(IntPredicate::SGT, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Leq => compiler
                            .builder
                            .build_int_compare(IntPredicate::SLE, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Geq => compiler
                            .builder
                            .build_int_compare(IntPredicate::SGE, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::And => compiler.builder.build_and(l, r, "").unwrap().into(),
                        BinOp::Or => compiler.builder.build_or(l, r, "").unwrap().into(),
                    }
                }
                BasicTypeEnum::FloatType(_) => {
                    let l = left_val.into_float_value();
                    let r = right_val.into_float_value();
                    match op {
                        BinOp::Add => compiler.builder.build_float_add(l, r, "").unwrap().into(),
                        BinOp::Sub => compiler.builder.build_float_sub(l, r, "").unwrap().into(),
                        BinOp::Mul => compiler.builder.build_float_mul(l, r, "").unwrap().into(),
                        BinOp::Div => compiler.builder.build_float_div(l, r, "").unwrap().into(),
                        BinOp::Eq => compiler
                            .builder
                            .build_float_compare(FloatPredicate::OEQ, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Neq => compiler
                            .builder
                            .build_float_compare(FloatPredicate::ONE, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Lt => compiler
                            .builder
                            .build_float_compare(FloatPredicate::OLT, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Gt => compiler
                            .builder
                            .build_float_compare(FloatPredicate::OGT, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Leq => compiler
                            .builder
                            .build_float_compare(FloatPredicate::OLE, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Geq => compiler
                            .builder
                            .build_float_compare(FloatPredicate::OGE, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::And | BinOp::Or => {
                            panic!("logical operator '{}' on float operands", op)
                        }
                    }
                }
                // Strings compare by address; nothing else is defined on them
                BasicTypeEnum::PointerType(_) => {
                    let l = compiler
                        .builder
                        .build_ptr_to_int(
                            left_val.into_pointer_value(),
                            compiler.context.i64_type(),
                            "",
                        )
                        .unwrap();
                    let r = compiler
                        .builder
                        .build_ptr_to_int(
                            right_val.into_pointer_value(),
                            compiler.context.i64_type(),
                            "",
                        )
                        .unwrap();
                    match op {
                        BinOp::Eq => compiler
                            .builder
                            .build_int_compare(IntPredicate::EQ, l, r, "")
                            .unwrap()
                            .into(),
                        BinOp::Neq => compiler
                            .builder
                            .build_int_compare(IntPredicate::NE, l, r, "")
                            .unwrap()
                            .into(),
                        _ => panic!("operator '{}' is not lowerable for string operands", op),
                    }
                }
                other => panic!("invalid type for binary operation: {:?}", other),
            }
        }

        NodeKind::Unary { op, operand } => {
            let value = gen_expression(compiler, operand);
            match op {
                UnOp::Neg => match value {
                    BasicValueEnum::FloatValue(float) => {
                        compiler.builder.build_float_neg(float, "").unwrap().into()
                    }
                    BasicValueEnum::IntValue(int) => {
                        compiler.builder.build_int_neg(int, "").unwrap().into()
                    }
                    other => panic!("invalid operand for unary '-': {:?}", other),
                },
                UnOp::Not => compiler
                    .builder
                    .build_not(value.into_int_value(), "")
                    .unwrap()
                    .into(),
            }
        }

        NodeKind::BuiltinCall { name, args } => {
            if name != "input" {
                panic!("unknown builtin function {:?}", name);
            }
            gen_input(compiler, args)
        }

        other => panic!("node is not an expression: {:?}", other),
    }
}

/// Lowers the `input` builtin: one `scanf` call into a fresh slot.
///
/// An optional leading string literal selects the scan format and slot
/// type; without one the read defaults to int. String reads hand back the
/// buffer pointer itself, every other kind loads the scanned slot.
fn gen_input<'a>(compiler: &Compiler<'a>, args: &[Node]) -> BasicValueEnum<'a> {
    let scanf = compiler.module.get_function("scanf").unwrap();

    let mut hint = "int";
    if let Some(first) = args.first() {
        if let NodeKind::Literal(Literal::Str(value)) = &first.kind {
            hint = value.as_str();
        }
    }

    if hint == "string" {
        let format = compiler
            .builder
            .build_global_string_ptr("%s", "")
            .unwrap()
            .as_pointer_value();
        let buffer = compiler
            .builder
            .build_array_alloca(
                compiler.context.i8_type(),
                compiler.context.i32_type().const_int(256, false),
                "",
            )
            .unwrap();
        compiler
            .builder
            .build_call(scanf, &[format.into(), buffer.into()], "")
            .unwrap();
        return buffer.into();
    }

    let (format, slot_type): (&str, BasicTypeEnum<'a>) = match hint {
        "float" => ("%f", compiler.context.f32_type().into()),
        "bool" => ("%d", compiler.context.bool_type().into()),
        _ => ("%d", compiler.context.i32_type().into()),
    };

    let format = compiler
        .builder
        .build_global_string_ptr(format, "")
        .unwrap()
        .as_pointer_value();
    let slot = compiler.builder.build_alloca(slot_type, "").unwrap();
    compiler
        .builder
        .build_call(scanf, &[format.into(), slot.into()], "")
        .unwrap();

    compiler.builder.build_load(slot, "").unwrap()
}
