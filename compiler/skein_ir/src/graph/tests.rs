use crate::{DType, Module, OpKind, Ty, Use, ValueDef};

fn t4() -> Ty {
    Ty::tensor(DType::F32, &[4])
}

#[test]
fn push_op_registers_uses_and_results() {
    let mut m = Module::new();
    let x = m.add_input(t4());
    let name = m.intern("mul");
    let root = m.root();
    let op = m.push_op(
        root,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x, x],
        &[t4()],
    );

    assert_eq!(m.op(op).operands(), &[x, x]);
    assert_eq!(m.op(op).results().len(), 1);
    let result = m.op(op).results()[0];
    assert_eq!(
        m.value(result).def,
        ValueDef::OpResult { op, index: 0 }
    );
    // Both operand slots show up as distinct uses of x.
    assert_eq!(
        m.value(x).uses(),
        &[Use { op, operand: 0 }, Use { op, operand: 1 }]
    );
    assert!(m.value(result).uses().is_empty());
}

#[test]
fn set_operand_rewires_use_lists() {
    let mut m = Module::new();
    let x = m.add_input(t4());
    let y = m.add_input(t4());
    let name = m.intern("neg");
    let root = m.root();
    let op = m.push_op(
        root,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x],
        &[t4()],
    );

    m.set_operand(op, 0, y);

    assert_eq!(m.op(op).operands(), &[y]);
    assert!(m.value(x).uses().is_empty());
    assert_eq!(m.value(y).uses(), &[Use { op, operand: 0 }]);
}

#[test]
fn set_operand_to_same_value_is_a_no_op() {
    let mut m = Module::new();
    let x = m.add_input(t4());
    let name = m.intern("neg");
    let root = m.root();
    let op = m.push_op(
        root,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x],
        &[t4()],
    );

    m.set_operand(op, 0, x);

    assert_eq!(m.value(x).uses(), &[Use { op, operand: 0 }]);
}

#[test]
fn insert_op_before_positions_in_parent() {
    let mut m = Module::new();
    let x = m.add_input(t4());
    let name = m.intern("f");
    let root = m.root();
    let first = m.push_op(
        root,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x],
        &[t4()],
    );
    let inserted = m.insert_op_before(first, OpKind::Launch, Vec::new(), &[t4()]);

    assert_eq!(m.region(root).ops(), &[inserted, first]);
    assert_eq!(m.op(inserted).parent(), root);
}

#[test]
fn move_op_before_is_stable_across_regions() {
    let mut m = Module::new();
    let x = m.add_input(t4());
    let name = m.intern("f");
    let root = m.root();
    let a = m.push_op(
        root,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x],
        &[t4()],
    );
    let b = m.push_op(
        root,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x],
        &[t4()],
    );
    let holder = m.push_op(root, OpKind::Launch, Vec::new(), &[]);
    let body = m.attach_body(holder);
    let term = m.push_op(body, OpKind::Return, Vec::new(), &[]);

    m.move_op_before(a, term);
    m.move_op_before(b, term);

    assert_eq!(m.region(root).ops(), &[holder]);
    assert_eq!(m.region(body).ops(), &[a, b, term]);
    assert_eq!(m.op(a).parent(), body);
    assert_eq!(m.op(b).parent(), body);
}

#[test]
fn terminator_requires_trailing_return() {
    let mut m = Module::new();
    let x = m.add_input(t4());
    let name = m.intern("f");
    let root = m.root();
    let op = m.push_op(
        root,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x],
        &[t4()],
    );
    assert_eq!(m.terminator(root), None);

    let result = m.op(op).results()[0];
    let term = m.push_op(root, OpKind::Return, vec![result], &[]);
    assert_eq!(m.terminator(root), Some(term));
}

#[test]
fn defining_region_of_inputs_and_results() {
    let mut m = Module::new();
    let x = m.add_input(t4());
    let root = m.root();
    let cluster = m.push_op(root, OpKind::Cluster, Vec::new(), &[]);
    let body = m.attach_body(cluster);
    let name = m.intern("f");
    let inner = m.push_op(
        body,
        OpKind::Compute {
            name,
            host_eligible: false,
        },
        vec![x],
        &[t4()],
    );

    assert_eq!(m.defining_region(x), root);
    let inner_result = m.op(inner).results()[0];
    assert_eq!(m.defining_region(inner_result), body);
}

#[test]
fn append_result_extends_cluster_results() {
    let mut m = Module::new();
    let root = m.root();
    let cluster = m.push_op(root, OpKind::Cluster, Vec::new(), &[]);
    let r0 = m.append_result(cluster, t4());
    let r1 = m.append_result(cluster, Ty::scalar(DType::I32));

    assert_eq!(m.op(cluster).results(), &[r0, r1]);
    assert_eq!(
        m.value(r1).def,
        ValueDef::OpResult {
            op: cluster,
            index: 1
        }
    );
}
