#![allow(dead_code)]

use astgen::*;

#[test]
fn can_generate_ast() {
    generate_ast!(
        TestAst,
        [ S => { s: String } ]
    );
    let _node = TestAst::S(S { s: "".into() });
}

#[test]
fn uses_field_names_for_struct_fields() {
    generate_ast!(
        Example,
        [ Let => { name: String, value: i64 } ]
    );
    let node = Let { name: "x".into(), value: 5 };
    assert_eq!(node.name, "x");
    assert_eq!(node.value, 5);
}

#[test]
fn can_clone_nodes() {
    generate_ast!(A, [N => {a: usize}]);
    let n = A::N(N { a: 0 });
    assert_eq!(n.clone(), n);
}

#[test]
fn supports_recursive_nodes() {
    generate_ast!(
        Tree,
        [
            Leaf => { value: i64 };
            Prefix => { operator: char, right: Box<Tree> };
        ]
    );
    let node = Tree::new_prefix('-', Box::new(Tree::new_leaf(1)));
    assert_eq!(node, Tree::Prefix(Prefix { operator: '-', right: Box::new(Tree::Leaf(Leaf { value: 1 })) }));
}

#[test]
fn generates_new_fns() {
    generate_ast!(
        Test,
        [
            A => { a: isize };
            BNode => { b: usize, c: bool };
        ]
    );
    assert_eq!(Test::new_a(1), Test::A(A { a: 1 }));
    assert_eq!(Test::new_b_node(8, true), Test::BNode(BNode { b: 8, c: true }));
}

#[test]
fn generates_visitor_trait() {
    generate_ast!(
        Shape,
        [
            ANode => { a: isize };
            OtherNode => { b: String };
        ]
    );
    struct V;
    impl Visitor<()> for V {
        fn visit_a_node_shape(&mut self, _a: &ANode) {}
        fn visit_other_node_shape(&mut self, _o: &OtherNode) {}
    }
}

#[test]
fn accept_fn_routes_calls_to_correct_visitor_fn() {
    generate_ast!(
        VisitMe,
        [
            NotMe => { a: String };
            Test => { a: isize };
        ]
    );
    struct V {
        visited: Vec<&'static str>,
    }
    impl Visitor<isize> for V {
        fn visit_not_me_visitme(&mut self, _t: &NotMe) -> isize {
            self.visited.push("not me");
            0
        }
        fn visit_test_visitme(&mut self, t: &Test) -> isize {
            self.visited.push("test");
            t.a
        }
    }
    let mut visitor = V { visited: Vec::new() };
    let node = VisitMe::new_test(7);
    assert_eq!(node.accept(&mut visitor), 7);
    assert_eq!(visitor.visited, vec!["test"]);
}

#[test]
fn shared_fields_lead_every_node() {
    generate_ast!(
        Located { line: usize },
        [
            Leaf => { value: i64 };
            Pair => { left: Box<Located>, right: Box<Located> };
        ]
    );
    let leaf = Located::new_leaf(3, 10);
    assert_eq!(leaf, Located::Leaf(Leaf { line: 3, value: 10 }));
    assert_eq!(*leaf.line(), 3);

    let pair = Located::new_pair(4, Box::new(leaf.clone()), Box::new(leaf));
    assert_eq!(*pair.line(), 4);
}

#[test]
fn nodes_may_have_only_shared_fields() {
    generate_ast!(Marker { id: u8 }, [ Empty => {} ]);
    let m = Marker::new_empty(1);
    assert_eq!(*m.id(), 1);
}
