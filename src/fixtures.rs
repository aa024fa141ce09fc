#[cfg(test)]
pub mod test {
    use hcl_edit::structure::{Block, Body};

    /// Parse `src` into an editable body.
    pub fn body(src: &str) -> Body {
        hcl_edit::parser::parse_body(src).unwrap()
    }

    /// The attribute `key` of `body`, as a plain expression for comparisons.
    pub fn attr(body: &Body, key: &str) -> Option<hcl::Expression> {
        body.get_attribute(key)
            .map(|a| hcl::Expression::from(a.value.clone()))
    }

    /// An integer expression.
    pub fn num(n: u64) -> hcl::Expression {
        hcl::Expression::Number(hcl::Number::from(n))
    }

    /// All direct blocks of `body` with the given type.
    pub fn blocks<'a>(body: &'a Body, ident: &str) -> Vec<&'a Block> {
        body.blocks().filter(|b| b.ident.as_str() == ident).collect()
    }

    pub fn labels(block: &Block) -> Vec<&str> {
        block.labels.iter().map(|l| l.as_str()).collect()
    }

    // -- Documents shared by the orchestration tests ---------------------------

    pub const BASE: &str = r#"# shared settings
region = "us-east-1"
instance_count = 1

variable "environment" {
  default = "dev"
}

resource "aws_instance" "web" {
  ami           = "ami-base"
  instance_type = "t3.micro"

  root_block_device {
    volume_size = 8
  }
}

data "aws_ami" "ubuntu" {
  most_recent = true
}
"#;

    pub const OVERLAY: &str = r#"instance_count = 3
owner = "platform"

variable "environment" {
  default = "prod"
}

resource "aws_instance" "web" {
  instance_type = "m5.large"
  subnet_id     = var.subnet_id

  ebs_block_device {
    device_name = "/dev/sdb"
  }
}

resource "aws_s3_bucket" "logs" {
  bucket = "logs"
}
"#;
}
