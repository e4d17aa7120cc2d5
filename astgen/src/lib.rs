use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
    Ident, Token, Type,
};
use quote::{format_ident, quote};
use heck::SnakeCase;

/// Input to `generate_ast!`:
/// ```text
/// generate_ast!(
///     $AST_NAME $({ $($SHARED_FIELD: $SHARED_TYPE),+ })?,
///     [$($NODE_NAME => { $($FIELD_NAME: $FIELD_TYPE),* });+]
/// )
/// ```
///
/// Shared fields are prepended to every node and get an accessor on the enum:
/// ```text
/// generate_ast!(
///     Expr { token: Token },
///     [
///         Integer => { value: i64 };
///         Infix   => { left: Box<Expr>, operator: TokenKind, right: Box<Expr> };
///     ]
/// )
/// ```
struct AstDef {
    name: Ident,
    shared: Vec<FieldDef>,
    nodes: Vec<NodeDef>,
}

struct NodeDef {
    name: Ident,
    fields: Vec<FieldDef>,
}

struct FieldDef {
    name: Ident,
    ty: Type,
}

impl Parse for FieldDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse()?;
        input.parse::<Token![:]>()?;
        let ty = input.parse()?;
        Ok(FieldDef { name, ty })
    }
}

fn braced_fields(input: ParseStream) -> Result<Vec<FieldDef>> {
    let content;
    syn::braced!(content in input);
    let fields: Punctuated<FieldDef, Token![,]> = content.parse_terminated(FieldDef::parse)?;
    Ok(fields.into_iter().collect())
}

impl Parse for NodeDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse()?;
        input.parse::<Token![=>]>()?;
        let fields = braced_fields(input)?;
        Ok(NodeDef { name, fields })
    }
}

impl Parse for AstDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse()?;
        let shared = if input.peek(syn::token::Brace) {
            braced_fields(input)?
        } else {
            Vec::new()
        };
        input.parse::<Token![,]>()?;

        let content;
        syn::bracketed!(content in input);
        let nodes: Punctuated<NodeDef, Token![;]> = content.parse_terminated(NodeDef::parse)?;
        Ok(AstDef { name, shared, nodes: nodes.into_iter().collect() })
    }
}

impl NodeDef {
    fn snake_name(&self) -> String {
        self.name.to_string().to_snake_case()
    }
}

impl AstDef {
    fn visit_fn(&self, node: &NodeDef) -> Ident {
        format_ident!("visit_{}_{}", node.snake_name(), self.name.to_string().to_lowercase())
    }

    fn all_fields<'a>(&'a self, node: &'a NodeDef) -> impl Iterator<Item = &'a FieldDef> {
        self.shared.iter().chain(node.fields.iter())
    }

    fn sum_type(&self) -> TokenStream2 {
        let name = &self.name;
        let variants: Vec<_> = self.nodes.iter().map(|n| &n.name).collect();
        quote! {
            #[derive(Debug, PartialEq, Clone)]
            pub enum #name {
                #(#variants(#variants)),*
            }
        }
    }

    fn node_struct(&self, node: &NodeDef) -> TokenStream2 {
        let node_name = &node.name;
        let fields = self.all_fields(node).map(|FieldDef { name, ty }| {
            quote! { pub(crate) #name: #ty }
        });
        quote! {
            #[derive(Debug, PartialEq, Clone)]
            pub struct #node_name {
                #(#fields),*
            }
        }
    }

    fn constructor(&self, node: &NodeDef) -> TokenStream2 {
        let name = &self.name;
        let node_name = &node.name;
        let fn_name = format_ident!("new_{}", node.snake_name());
        let params = self.all_fields(node).map(|FieldDef { name, ty }| quote! { #name: #ty });
        let field_names = self.all_fields(node).map(|f| &f.name);
        quote! {
            pub(crate) fn #fn_name(#(#params),*) -> Self {
                #name::#node_name(#node_name { #(#field_names),* })
            }
        }
    }

    fn shared_accessor(&self, field: &FieldDef) -> TokenStream2 {
        let name = &self.name;
        let FieldDef { name: field_name, ty } = field;
        let variants = self.nodes.iter().map(|n| &n.name);
        quote! {
            pub fn #field_name(&self) -> &#ty {
                match self {
                    #(#name::#variants(n) => &n.#field_name,)*
                }
            }
        }
    }

    fn visitor(&self) -> TokenStream2 {
        let name = &self.name;
        let variants: Vec<_> = self.nodes.iter().map(|n| &n.name).collect();
        let visit_fns: Vec<_> = self.nodes.iter().map(|n| self.visit_fn(n)).collect();
        quote! {
            pub(crate) trait Visitor<T> {
                #(fn #visit_fns(&mut self, e: &#variants) -> T;)*
            }

            impl #name {
                pub(crate) fn accept<T, V: Visitor<T>>(&self, v: &mut V) -> T {
                    match self {
                        #(#name::#variants(n) => v.#visit_fns(n),)*
                    }
                }
            }
        }
    }
}

/// Generates a closed sum type over the given nodes together with:
/// - one struct per node, holding the shared fields followed by its own;
/// - a `new_<node>` constructor per node;
/// - an accessor per shared field;
/// - a `Visitor` trait and an exhaustive `accept` dispatch.
#[proc_macro]
pub fn generate_ast(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as AstDef);
    let name = &ast.name;

    let sum_type = ast.sum_type();
    let structs = ast.nodes.iter().map(|n| ast.node_struct(n));
    let constructors = ast.nodes.iter().map(|n| ast.constructor(n));
    let accessors = ast.shared.iter().map(|f| ast.shared_accessor(f));
    let visitor = ast.visitor();

    (quote! {
        #sum_type
        #(#structs)*

        impl #name {
            #(#constructors)*
            #(#accessors)*
        }

        #visitor
    }).into()
}
