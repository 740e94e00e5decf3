use convert_case::{Case, Casing};
use std::{env, fs::File, path::Path};

use genco::{
    fmt,
    prelude::{rust::Tokens, *},
};

const EXPR_RULES: &'static [&'static str] = &[
    "Assign   : Token name, Expr value",
    "Binary   : Expr left, Token operator, Expr right",
    "Call     : Expr callee, Token paren, Vec<Expr> arguments",
    "Get      : Expr object, Token name",
    "Grouping : Expr expression",
    "Literal  : Literal value",
    "Logical  : Expr left, Token operator, Expr right",
    "Set      : Expr object, Token name, Expr value",
    "Super    : Token keyword, Token method",
    "This     : Token keyword",
    "Unary    : Token operator, Expr right",
    "Variable : Token name",
];

const STMT_RULES: &'static [&'static str] = &[
    "Block      : Vec<Stmt> statements",
    "Class      : Token name, Option<VariableExpr> superclass, Vec<FunctionStmt> methods",
    "Expression : Expr expression",
    "Function   : Token name, Vec<Token> params, Vec<Stmt> body",
    "If         : Expr condition, Stmt then_branch, Stmt else_branch",
    "Print      : Expr expression",
    "Return     : Token keyword, Option<Expr> value",
    "Var        : Token name, Option<Expr> initializer",
    "While      : Expr condition, Stmt body",
];

fn main() -> anyhow::Result<()> {
    write_module("expr", EXPR_RULES, true)?;
    write_module("stmt", STMT_RULES, false)?;

    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}

// Expression nodes carry a parser-assigned id so the resolver can key its
// side-table on the occurrence rather than on structure.
fn write_module(
    base: &'static str,
    rules: &'static [&'static str],
    with_ids: bool,
) -> anyhow::Result<()> {
    let module = &format!("{}_generated", base);
    let walk_fn = &format!("walk_{}", base);
    let enum_name = &base.to_case(Case::Title);

    let tokens: rust::Tokens = quote! {
        mod $module {
            $(define_aliases(base))

            pub(crate) trait Visitor<T> {
                $(define_visitor_trait(rules, base, enum_name))
            }

            #[derive(Clone, Debug)]
            pub(crate) enum $enum_name {
                $(define_enum(rules, enum_name))
            }

            pub(crate) fn $walk_fn<T>(visitor: &dyn Visitor<T>, $base: &$enum_name) -> T {
                match $base {
                    $(define_walk(rules, enum_name))
                }
            }

            $(define_types(rules, enum_name, with_ids))
        }
    };

    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join(format!("{}.rs", module));
    let file = File::create(dest_path)?;

    let mut w = fmt::IoWriter::new(file);
    let fmt = fmt::Config::from_lang::<Rust>().with_indentation(fmt::Indentation::Space(4));
    let config = rust::Config::default().with_default_import(rust::ImportMode::Direct);
    tokens.format_file(&mut w.as_formatter(&fmt), &config)?;

    Ok(())
}

fn define_aliases(base: &str) -> Tokens {
    match base {
        "expr" => quote! {
            type Literal = crate::tokens::Literal;
            type Token = crate::tokens::Token;
        },
        _ => quote! {
            type Token = crate::tokens::Token;
            type Expr = crate::expr::Expr;
            type VariableExpr = crate::expr::VariableExpr;
        },
    }
}

fn define_visitor_trait(rules: &[&str], base: &str, enum_name: &str) -> Tokens {
    let mut tokens = Tokens::new();

    for rule in rules.iter() {
        let raw_name = rule.split_once(":").unwrap().0.trim();

        let name_snake = &raw_name.to_case(Case::Snake);
        let class = &format!("{}{}", raw_name.to_case(Case::Title), enum_name);

        tokens.append(quote! {
            fn visit_$name_snake(&self, $base: &$class) -> T;
        })
    }

    return tokens;
}

fn define_enum(rules: &[&str], enum_name: &str) -> Tokens {
    let mut tokens = Tokens::new();

    for rule in rules.iter() {
        let title = &rule.split_once(":").unwrap().0.trim().to_case(Case::Title);
        let class = &format!("{}{}", title, enum_name);

        tokens.append(quote! {
            $title($class),
        })
    }

    return tokens;
}

fn define_walk(rules: &[&str], enum_name: &str) -> Tokens {
    let mut tokens = Tokens::new();

    for rule in rules.iter() {
        let raw_name = rule.split_once(":").unwrap().0.trim();

        let var = &raw_name.to_case(Case::Snake);
        let title = &raw_name.to_case(Case::Title);
        let c = &var.chars().next().unwrap().to_string();

        tokens.append(quote! {
            $enum_name::$title($c) => visitor.visit_$var($c),
        })
    }

    return tokens;
}

fn define_types(rules: &[&str], enum_name: &str, with_ids: bool) -> Tokens {
    let mut tokens = Tokens::new();

    for rule in rules.iter() {
        tokens.append(define_type(rule, enum_name, with_ids));
    }

    return tokens;
}

struct Field {
    type_name: String,
    name: String,
}

fn define_type(rule: &str, enum_name: &str, with_ids: bool) -> Tokens {
    let (raw_name, raw_fields) = rule.split_once(":").unwrap();

    let class = &format!("{}{}", raw_name.trim().to_case(Case::Title), enum_name);
    let fields: Vec<Field> = raw_fields.split(", ").map(parse_field).collect();

    quote! {
        #[derive(Clone, Debug)]
        pub(crate) struct $class {
            $(define_struct_fields(&fields, enum_name, with_ids))
        }

        impl $class {
            pub(crate) fn new($(define_constructor_parameters(&fields, with_ids))) -> $class {
                $class {
                    $(define_constructor_assignment(&fields, enum_name, with_ids))
                }
            }
        }
    }
}

fn define_struct_fields(fields: &Vec<Field>, enum_name: &str, with_ids: bool) -> Tokens {
    let mut tokens = Tokens::new();

    if with_ids {
        tokens.append(quote! {
            pub id: usize,
        });
    }

    for field in fields {
        let name = &field.name;
        let type_name = &match field.type_name == enum_name {
            true => format!("Box<{}>", enum_name),
            false => field.type_name.clone(),
        };

        tokens.append(quote! {
            pub $name: $type_name,
        });
    }

    return tokens;
}

fn define_constructor_parameters(fields: &Vec<Field>, with_ids: bool) -> Tokens {
    let mut tokens = Tokens::new();

    if with_ids {
        tokens.append(quote! {
            id: usize,
        });
    }

    for field in fields {
        let name = &field.name;
        let type_name = &field.type_name;

        tokens.append(quote! {
            $name: $type_name,
        });
    }

    return tokens;
}

fn define_constructor_assignment(fields: &Vec<Field>, enum_name: &str, with_ids: bool) -> Tokens {
    let mut tokens = Tokens::new();

    if with_ids {
        tokens.append(quote! {
            id,
        });
    }

    for field in fields {
        let name = &field.name;

        tokens.append(match field.type_name == enum_name {
            true => quote! { $name: Box::new($name), },
            false => quote! { $name, },
        });
    }

    return tokens;
}

fn parse_field(field: &str) -> Field {
    let (type_name, name) = field.trim().split_once(" ").unwrap();

    Field {
        type_name: type_name.to_string(),
        name: name.to_string(),
    }
}
