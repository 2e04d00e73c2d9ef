//! Main lowering module.
//!
//! This module contains the core Compiler structure and the entry point
//! that turns an analyzed tree into a verified LLVM module. It manages the
//! LLVM module and builder, the flat name-to-slot storage map, and the
//! stack of loop targets used by `stop`/`skip`.

use std::{collections::HashMap, path::PathBuf};

use inkwell::{
    attributes::{Attribute, AttributeLoc},
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::{Linkage, Module},
    targets::{CodeModel, InitializationConfig, RelocMode, Target, TargetMachine},
    types::{BasicTypeEnum, FunctionType},
    values::{FunctionValue, PointerValue},
    AddressSpace, OptimizationLevel,
};

use crate::{
    ast::ast::{Node, NodeKind},
    ast::types::Type,
    errors::errors::LowerError,
};

use super::stmt::gen_statement;

/// Branch targets of the innermost loop being lowered: `latch` is where the
/// condition is evaluated (the `skip` target), `after` is the block the
/// loop exits into (the `stop` target).
#[derive(Debug, Clone, Copy)]
pub struct LoopBlocks<'a> {
    pub latch: BasicBlock<'a>,
    pub after: BasicBlock<'a>,
}

/// The state of one lowering run.
///
/// Storage is routine-wide: `named_allocas` maps identifier text straight
/// to its stack slot with no scope nesting — the analyzer already resolved
/// scoping, and the whole program compiles into a single routine.
pub struct Compiler<'a> {
    /// Reference to the LLVM context
    pub context: &'a Context,
    /// The LLVM module being built
    pub module: Module<'a>,
    /// The LLVM IR builder; its insert block is the current insertion point
    pub builder: Builder<'a>,

    /// Map of variable names to their stack slots
    pub named_allocas: HashMap<String, PointerValue<'a>>,
    /// Stack of enclosing-loop branch targets, innermost last
    pub loop_blocks: Vec<LoopBlocks<'a>>,
}

impl<'a> Compiler<'a> {
    pub fn new(context: &'a Context, file_name: &str) -> Self {
        Compiler {
            context,
            module: context.create_module(file_name),
            builder: context.create_builder(),
            named_allocas: HashMap::new(),
            loop_blocks: vec![],
        }
    }

    /// Saves the current LLVM module to a file.
    pub fn save_module_to_file(&self, output_file: PathBuf) {
        self.module.print_to_file(output_file).unwrap();
    }

    /// The module's textual IR.
    pub fn ir_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Maps a declared type to the LLVM type of its storage slot.
    ///
    /// `char` stores as a byte; anything without storage semantics of its
    /// own falls back to a 32-bit integer slot.
    pub fn convert_type(&self, ty: Type) -> BasicTypeEnum<'a> {
        match ty {
            Type::Int => self.context.i32_type().into(),
            Type::Float => self.context.f32_type().into(),
            Type::Bool => self.context.bool_type().into(),
            Type::String => self
                .context
                .i8_type()
                .ptr_type(AddressSpace::default())
                .into(),
            Type::Char => self.context.i8_type().into(),
            Type::Void | Type::Error | Type::Unknown => self.context.i32_type().into(),
        }
    }

    /// Declares the C runtime functions the lowered code calls into.
    fn create_external_functions(&self) {
        let i8_ptr_type = self.context.i8_type().ptr_type(AddressSpace::default());

        let printf_type = self.context.i32_type().fn_type(&[i8_ptr_type.into()], true);
        self.module
            .add_function("printf", printf_type, Some(Linkage::External));

        let scanf_type = self.context.i32_type().fn_type(&[i8_ptr_type.into()], true);
        self.module
            .add_function("scanf", scanf_type, Some(Linkage::External));
    }

    /// Creates a function in the module, appends its entry block and
    /// positions the builder there.
    pub fn create_function(&self, name: &str, function_type: FunctionType<'a>) -> FunctionValue<'a> {
        let function = match self.module.get_function(name) {
            Some(function) => function,
            None => self
                .module
                .add_function(name, function_type, Some(Linkage::External)),
        };

        let entry = self.create_basic_block("entry", function);
        self.builder.position_at_end(entry);

        let attributes = [
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("uwtable"), 0),
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("nounwind"), 0),
        ];

        for attribute in attributes.iter() {
            function.add_attribute(AttributeLoc::Function, *attribute);
        }

        function
    }

    /// Creates a new basic block in the given function.
    fn create_basic_block(&self, name: &str, function: FunctionValue<'a>) -> BasicBlock<'a> {
        self.context.append_basic_block(function, name)
    }

    /// Sets up the target machine, lowers the whole program into `main`
    /// and verifies the finished module.
    fn compile(&mut self, program: &Node) -> Result<(), LowerError> {
        Target::initialize_all(&InitializationConfig::default());
        let target_triple = TargetMachine::get_default_triple();
        let target = Target::from_triple(&target_triple).unwrap();
        let target_machine = target
            .create_target_machine(
                &target_triple,
                "generic",
                "",
                OptimizationLevel::Aggressive,
                RelocMode::PIC,
                CodeModel::Default,
            )
            .unwrap();

        self.module.set_triple(&target_triple);
        self.module
            .set_data_layout(&target_machine.get_target_data().get_data_layout());

        self.create_external_functions();

        // The whole lowered program is a single entry routine.
        self.create_function("main", self.context.i32_type().fn_type(&[], false));

        self.gen(program);

        // The routine unconditionally reports success.
        self.builder
            .build_return(Some(&self.context.i32_type().const_zero()))
            .unwrap();

        self.module
            .verify()
            .map_err(|message| LowerError::InvalidModule {
                message: message.to_string(),
            })
    }

    /// Lowers the top-level statement sequence at the current insertion
    /// point.
    fn gen(&mut self, program: &Node) {
        match &program.kind {
            NodeKind::Program { statements } => {
                for statement in statements {
                    gen_statement(self, statement);
                }
            }
            // A bare statement also works as a root; useful for callers
            // lowering a fragment.
            _ => gen_statement(self, program),
        }
    }
}

/// Lowers an analyzed tree into a fresh module and returns the Compiler
/// holding it, or the verification failure if the module is not internally
/// consistent.
pub fn compile<'a>(
    program: &Node,
    file_name: &str,
    context: &'a Context,
) -> Result<Compiler<'a>, LowerError> {
    let mut compiler = Compiler::new(context, file_name);
    compiler.compile(program)?;
    Ok(compiler)
}
