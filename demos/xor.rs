use crossfold_nn::data::builtin;
use crossfold_nn::{train_epoch, Network, NetworkSpec, Sgd};

fn main() {
    let data = builtin::xor();
    let mut network = Network::seeded(&NetworkSpec::new(2, 1, 3, 1), 7).expect("valid topology");

    let optimizer = Sgd::new(0.5);
    let epochs = 6000;

    for epoch in 0..epochs {
        let loss = train_epoch(&mut network, &data, &optimizer).expect("matching dimensions");
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for example in &data {
        let output = network.predict(example.features()).expect("matching dimensions")[0];
        println!(
            "Input: {:?} -> Output: {output:.4} (expected {})",
            example.features(),
            example.label()[0]
        );
    }
}
