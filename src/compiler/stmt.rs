use inkwell::{
    values::{BasicMetadataValueEnum, BasicValueEnum, IntValue},
    IntPredicate,
};

use crate::ast::{
    ast::{Node, NodeKind},
    types::Literal,
};

use super::{
    compiler::{Compiler, LoopBlocks},
    expr::gen_expression,
};

/// Generates LLVM IR for the given statement at the current insertion
/// point. Control-flow statements leave the builder positioned on their
/// continuation block.
pub fn gen_statement<'a>(compiler: &mut Compiler<'a>, statement: &Node) {
    match &statement.kind {
        NodeKind::Declaration {
            declared_type,
            name,
            init,
        } => {
            let value = gen_expression(compiler, init);
            let slot = compiler
                .builder
                .build_alloca(compiler.convert_type(*declared_type), name)
                .unwrap();
            compiler.builder.build_store(slot, value).unwrap();
            compiler.named_allocas.insert(name.clone(), slot);
        }

        NodeKind::Assignment { name, value } => {
            let value = gen_expression(compiler, value);
            let slot = compiler
                .named_allocas
                .get(name)
                .copied()
                .unwrap_or_else(|| panic!("variable {:?} has no storage slot", name));
            compiler.builder.build_store(slot, value).unwrap();
        }

        NodeKind::Print { value } => gen_print(compiler, value),

        // The emitted routine's only return is the trailing success
        // status; a return statement contributes nothing to the IR.
        NodeKind::Return { .. } => {}

        NodeKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let condition_val = gen_expression(compiler, condition);
            let condition_val = coerce_to_bool(compiler, condition_val);

            let function = compiler
                .builder
                .get_insert_block()
                .unwrap()
                .get_parent()
                .unwrap();
            let then_block = compiler.context.append_basic_block(function, "then");
            let else_block = else_branch
                .as_ref()
                .map(|_| compiler.context.append_basic_block(function, "else"));
            let merge_block = compiler.context.append_basic_block(function, "ifcont");

            compiler
                .builder
                .build_conditional_branch(
                    condition_val,
                    then_block,
                    else_block.unwrap_or(merge_block),
                )
                .unwrap();

            compiler.builder.position_at_end(then_block);
            gen_statement(compiler, then_branch);
            compiler
                .builder
                .build_unconditional_branch(merge_block)
                .unwrap();

            if let Some(else_block) = else_block {
                compiler.builder.position_at_end(else_block);
                gen_statement(compiler, else_branch.as_ref().unwrap());
                compiler
                    .builder
                    .build_unconditional_branch(merge_block)
                    .unwrap();
            }

            compiler.builder.position_at_end(merge_block);
        }

        NodeKind::Repeat { condition, body } => {
            let function = compiler
                .builder
                .get_insert_block()
                .unwrap()
                .get_parent()
                .unwrap();
            let loop_block = compiler.context.append_basic_block(function, "loop");
            let latch_block = compiler.context.append_basic_block(function, "loopcond");
            let after_block = compiler.context.append_basic_block(function, "afterloop");

            // Post-test: the body always runs before the first check.
            compiler
                .builder
                .build_unconditional_branch(loop_block)
                .unwrap();
            compiler.builder.position_at_end(loop_block);

            compiler.loop_blocks.push(LoopBlocks {
                latch: latch_block,
                after: after_block,
            });
            gen_statement(compiler, body);
            compiler.loop_blocks.pop();

            compiler
                .builder
                .build_unconditional_branch(latch_block)
                .unwrap();

            compiler.builder.position_at_end(latch_block);
            let condition_val = gen_expression(compiler, condition);
            let condition_val = coerce_to_bool(compiler, condition_val);
            compiler
                .builder
                .build_conditional_branch(condition_val, loop_block, after_block)
                .unwrap();

            compiler.builder.position_at_end(after_block);
        }

        NodeKind::Break => {
            // Outside a loop the analyzer already flagged it; nothing to emit.
            if let Some(loop_blocks) = compiler.loop_blocks.last().copied() {
                compiler
                    .builder
                    .build_unconditional_branch(loop_blocks.after)
                    .unwrap();
                park_on_dead_block(compiler, "afterstop");
            }
        }

        NodeKind::Continue => {
            if let Some(loop_blocks) = compiler.loop_blocks.last().copied() {
                compiler
                    .builder
                    .build_unconditional_branch(loop_blocks.latch)
                    .unwrap();
                park_on_dead_block(compiler, "afterskip");
            }
        }

        NodeKind::Block { statements } => {
            // Storage is routine-wide: a block introduces no new slots.
            for statement in statements {
                gen_statement(compiler, statement);
            }
        }

        NodeKind::Program { statements } => {
            for statement in statements {
                gen_statement(compiler, statement);
            }
        }

        // An expression in statement position is lowered for its side
        // effects and the value dropped.
        NodeKind::Literal(_)
        | NodeKind::Identifier { .. }
        | NodeKind::Binary { .. }
        | NodeKind::Unary { .. }
        | NodeKind::BuiltinCall { .. } => {
            gen_expression(compiler, statement);
        }
    }
}

/// Lowers a print statement: one variadic `printf` call with the format
/// selected by the runtime IR type of the printed value.
fn gen_print<'a>(compiler: &Compiler<'a>, value: &Node) {
    let printf = compiler.module.get_function("printf").unwrap();
    let lowered = gen_expression(compiler, value);

    // String literals go straight through the %s path.
    if let NodeKind::Literal(Literal::Str(_)) = &value.kind {
        let format = compiler
            .builder
            .build_global_string_ptr("%s\n", "")
            .unwrap()
            .as_pointer_value();
        compiler
            .builder
            .build_call(printf, &[format.into(), lowered.into()], "")
            .unwrap();
        return;
    }

    let ty = lowered.get_type();
    let (format, argument): (&str, BasicMetadataValueEnum<'a>) =
        if ty == compiler.context.f32_type().into() {
            // printf varargs take doubles; widen before the call
            let widened = compiler
                .builder
                .build_float_ext(lowered.into_float_value(), compiler.context.f64_type(), "")
                .unwrap();
            ("%f\n", widened.into())
        } else if ty == compiler.context.f64_type().into() {
            ("%f\n", lowered.into())
        } else if ty == compiler.context.bool_type().into()
            || ty == compiler.context.i32_type().into()
        {
            ("%d\n", lowered.into())
        } else {
            ("[unsupported type]\n", lowered.into())
        };

    let format = compiler
        .builder
        .build_global_string_ptr(format, "")
        .unwrap()
        .as_pointer_value();
    compiler
        .builder
        .build_call(printf, &[format.into(), argument], "")
        .unwrap();
}

/// Branch conditions must be i1: wider integers are compared against zero,
/// an i1 passes through untouched.
fn coerce_to_bool<'a>(compiler: &Compiler<'a>, value: BasicValueEnum<'a>) -> IntValue<'a> {
    match value {
        BasicValueEnum::IntValue(int) => {
            if int.get_type().get_bit_width() == 1 {
                int
            } else {
                compiler
                    .builder
                    .build_int_compare(IntPredicate::NE, int, int.get_type().const_zero(), "")
                    .unwrap()
            }
        }
        other => panic!("condition value {:?} cannot be branched on", other),
    }
}

/// After a `stop`/`skip` jump the current block is terminated; park the
/// builder on a fresh unreachable block so trailing statements in the
/// source block still have somewhere to land.
fn park_on_dead_block<'a>(compiler: &Compiler<'a>, name: &str) {
    let function = compiler
        .builder
        .get_insert_block()
        .unwrap()
        .get_parent()
        .unwrap();
    let dead = compiler.context.append_basic_block(function, name);
    compiler.builder.position_at_end(dead);
}
